//! Storage collaborator contract and persistence implementation.
//!
//! # Responsibility
//! - Define the record store interface consumed by the commit pipeline.
//! - Keep SQL details out of the pipeline and the message hook.
//!
//! # Invariants
//! - "No such object" is reported through exactly one error kind,
//!   `StoreError::NotFound`.

pub mod record_repo;
