//! Host configuration consumed by the render stage and the commit pipeline.
//!
//! # Responsibility
//! - Define the `tag`/`undo`/`debug` switches and their defaults.
//! - Parse the host JSON blob into a typed value.
//!
//! # Invariants
//! - Configuration is passed explicitly into every call that needs it; core
//!   keeps no process-wide copy.
//! - Only `div` and `span` are accepted container tags.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Element used for editable containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerTag {
    #[default]
    Div,
    Span,
}

impl ContainerTag {
    /// HTML element name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Span => "span",
        }
    }

    /// Inline containers sit inside surrounding text, so a Backspace at the
    /// start of the field would otherwise reach the viewer shortcuts.
    pub fn suppresses_backspace(self) -> bool {
        matches!(self, Self::Span)
    }
}

/// Editing switches supplied by the host configuration collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Container element for editable regions.
    pub tag: ContainerTag,
    /// Register an undo checkpoint with each committed write.
    pub undo: bool,
    /// Compare the transport record id with the displayed record.
    pub debug: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            tag: ContainerTag::Div,
            undo: true,
            debug: false,
        }
    }
}

impl EditConfig {
    /// Parses the host JSON configuration blob.
    ///
    /// Missing keys fall back to defaults.
    ///
    /// # Errors
    /// - Returns `ConfigError::Parse` for malformed JSON or unsupported values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }
}

/// Configuration parse error.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid edit configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}
