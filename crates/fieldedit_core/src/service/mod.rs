//! Core use-case services.
//!
//! # Responsibility
//! - Normalize raw edits captured from editable containers.
//! - Orchestrate record-store calls into the field commit use-case.
//! - Keep the message hook decoupled from storage details.

pub mod commit_service;
pub mod normalize;
