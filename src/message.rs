//! Structured messages posted from the host to a surface's content.
//!
//! Every message carries a `command` string plus an arbitrary JSON payload.
//! The one command every surface must honor is [`command::DISPOSE`], which
//! triggers the in-surface resource cleanup. Unknown commands are tolerated
//! as no-ops on the receiving side.

use serde::{Deserialize, Serialize};

use crate::error::GlimpseError;

/// Well-known command strings.
pub mod command {
    /// Tells the surface content to run its resource cleanup routine.
    pub const DISPOSE: &str = "dispose";
}

/// A structured message addressed to one surface's in-content listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelMessage {
    /// Command discriminator. Receivers ignore commands they don't know.
    pub command: String,
    /// Free-form payload accompanying the command.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl PanelMessage {
    /// Build a message with no payload.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Build a message with a JSON payload.
    #[must_use]
    pub fn with_data(
        command: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            command: command.into(),
            data,
        }
    }

    /// The cleanup message understood by every surface.
    #[must_use]
    pub fn dispose() -> Self {
        Self::new(command::DISPOSE)
    }

    /// Whether this message requests resource cleanup.
    #[must_use]
    pub fn is_dispose(&self) -> bool {
        self.command == command::DISPOSE
    }

    /// Serialize to the JSON wire form posted into the surface.
    pub fn to_json(&self) -> Result<String, GlimpseError> {
        serde_json::to_string(self)
            .map_err(|e| GlimpseError::Message(e.to_string()))
    }

    /// Parse a message from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, GlimpseError> {
        serde_json::from_str(raw)
            .map_err(|e| GlimpseError::Message(e.to_string()))
    }
}
