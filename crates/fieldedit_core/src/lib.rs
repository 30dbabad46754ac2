//! Core logic for editing record fields in place inside a viewer.
//! This crate owns the eligibility classifier and the field commit pipeline.

pub mod bridge;
pub mod classify;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use bridge::message::{parse_message, BridgeMessage, MessageParseError};
pub use bridge::session::{EditSession, HookReply, SenderContext, ViewerSurface};
pub use classify::{classify, is_editable, Classifier, DirectiveFamily, Eligibility};
pub use config::{ConfigError, ContainerTag, EditConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::edit::{CommitOutcome, EditRequest, RenderDirective};
pub use model::record::{Field, Record, RecordId, TAGS_FIELD};
pub use render::{directive_for, field_filter, render_with_directive, RenderContext};
pub use repo::record_repo::{RecordStore, SqliteRecordStore, StoreError, StoreResult};
pub use service::commit_service::{CommitService, UNDO_CHECKPOINT_LABEL};
pub use service::normalize::normalize_field_value;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
