//! Transport message parsing.
//!
//! # Invariants
//! - Field name and record id never contain `#`; the raw value may, so only
//!   the first two separators after the prefix split the payload.
//! - Messages without a recognized prefix are not claimed (`None`).

use crate::model::edit::EditRequest;
use crate::model::record::RecordId;
use crate::render::{SAVE_COMMAND_PREFIX, SPEED_FOCUS_COMMAND};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PAYLOAD_SEPARATOR: char = '#';

/// Message recognized by the edit bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    /// Focus left an editable container.
    Save(EditRequest),
    /// Focus entered an editable container.
    SpeedFocus,
}

/// Claimed message with a malformed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageParseError {
    /// Fewer than three `#`-separated parts after the prefix.
    MissingParts { found: usize },
    /// Record id is neither empty nor an integer.
    InvalidRecordId(String),
}

impl Display for MessageParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParts { found } => {
                write!(f, "save message needs 3 payload parts, found {found}")
            }
            Self::InvalidRecordId(value) => write!(f, "invalid record id `{value}`"),
        }
    }
}

impl Error for MessageParseError {}

/// Parses one transport message.
///
/// Returns `None` when the message belongs to another consumer of the channel.
pub fn parse_message(url: &str) -> Option<Result<BridgeMessage, MessageParseError>> {
    if let Some(payload) = url.strip_prefix(SAVE_COMMAND_PREFIX) {
        return Some(parse_save_payload(payload).map(BridgeMessage::Save));
    }
    if url.starts_with(SPEED_FOCUS_COMMAND) {
        return Some(Ok(BridgeMessage::SpeedFocus));
    }
    None
}

fn parse_save_payload(payload: &str) -> Result<EditRequest, MessageParseError> {
    let mut parts = payload.splitn(3, PAYLOAD_SEPARATOR);
    let (Some(field_name), Some(record_id), Some(raw_value)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(MessageParseError::MissingParts {
            found: payload.splitn(3, PAYLOAD_SEPARATOR).count(),
        });
    };

    Ok(EditRequest::new(
        parse_record_id(record_id)?,
        field_name,
        raw_value,
    ))
}

// Empty id is the sentinel emitted when a field was rendered without a record.
fn parse_record_id(value: &str) -> Result<Option<RecordId>, MessageParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<RecordId>()
        .map(Some)
        .map_err(|_| MessageParseError::InvalidRecordId(value.to_string()))
}
