//! Error taxonomy for the rendering engine.
//!
//! Every variant is fatal for a render: nothing is written once one of these
//! is returned. Records that lack a schema column are not errors at all, they
//! simply render as empty cells.

use std::io;
use thiserror::Error;

/// Fatal rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    /// Settings are inconsistent with the requested format or schema
    #[error("configuration error: {0}")]
    Config(String),

    /// A destination or prior artifact could not be read or written
    #[error("failed to {action} {target}: {source}")]
    Io {
        action: &'static str,
        target: String,
        #[source]
        source: io::Error,
    },

    /// Prior output could not be parsed for append/merge
    #[error("cannot merge into existing {format} output at {target}: {reason}")]
    Parse {
        format: &'static str,
        target: String,
        reason: String,
    },
}

impl RenderError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        RenderError::Config(message.into())
    }

    pub(crate) fn io(action: &'static str, target: impl Into<String>, source: io::Error) -> Self {
        RenderError::Io {
            action,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn parse(
        format: &'static str,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RenderError::Parse {
            format,
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a configuration error (reported before any I/O)
    pub fn is_config(&self) -> bool {
        matches!(self, RenderError::Config(_))
    }
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, RenderError>;
