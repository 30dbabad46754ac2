//! UI bridge between the viewer transport and the commit pipeline.
//!
//! # Responsibility
//! - Recognize the save and speed-focus message shapes.
//! - Route claimed messages to the commit pipeline or the viewer.
//!
//! # Invariants
//! - Unrecognized messages are never claimed.
//! - No error escapes the message hook.

pub mod message;
pub mod session;
