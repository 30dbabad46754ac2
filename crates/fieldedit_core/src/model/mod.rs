//! Domain model for records, fields and edit requests.
//!
//! # Responsibility
//! - Define the record/field shape the commit pipeline reads and writes.
//! - Define the ephemeral values exchanged with the render stage and the
//!   message transport.
//!
//! # Invariants
//! - Every record is identified by a stable integer `RecordId`.
//! - Field names are unique within one record.

pub mod edit;
pub mod record;
