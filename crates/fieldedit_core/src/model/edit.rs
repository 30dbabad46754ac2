//! Ephemeral values exchanged while editing a field in place.
//!
//! # Responsibility
//! - Describe one edit as delivered by the message transport.
//! - Describe how the render stage should emit one field.
//! - Enumerate the terminal outcomes of a commit.
//!
//! # Invariants
//! - None of these values are persisted.

use crate::config::ContainerTag;
use crate::model::record::RecordId;
use std::fmt::{Display, Formatter};

/// One in-place edit parsed from a transport message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// `None` when the container was rendered without a current record
    /// (for example in a template preview).
    pub record_id: Option<RecordId>,
    pub field_name: String,
    /// Percent-encoded inner content of the editable container.
    pub raw_value: String,
}

impl EditRequest {
    pub fn new(
        record_id: Option<RecordId>,
        field_name: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            record_id,
            field_name: field_name.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Render-stage decision for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    /// Emit the text unchanged.
    Plain,
    /// Wrap the text in an editable container.
    Editable {
        field_name: String,
        /// Empty sentinel is emitted when `None`.
        record_id: Option<RecordId>,
        tag: ContainerTag,
        /// Backspace must not propagate past the container while the caret
        /// is inside it.
        suppress_backspace_propagation: bool,
    },
}

/// Terminal state of one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The record vanished before the edit arrived; nothing was written.
    StaleRecord,
    /// The field name is not declared on the record; nothing was written.
    UnknownField,
    /// The normalized value equals the stored one; nothing was written.
    NoOp,
    /// The record was persisted and a re-render was requested.
    Committed,
}

impl CommitOutcome {
    /// Stable lowercase id used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaleRecord => "stale_record",
            Self::UnknownField => "unknown_field",
            Self::NoOp => "no_op",
            Self::Committed => "committed",
        }
    }

    /// Returns whether this outcome persisted a write.
    pub fn wrote(self) -> bool {
        self == Self::Committed
    }
}

impl Display for CommitOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
