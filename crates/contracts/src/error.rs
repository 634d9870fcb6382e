//! Layered error definitions
//!
//! Categorized by source: config / sink / input

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Destination could not be opened; the sink is excluded from the run
    #[error("cannot open '{}': {source}", .path.display())]
    SinkOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write or flush failed; the sink is deactivated for the rest of the run
    #[error("write to '{}' failed: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Input Errors =====
    /// Fatal read error on the input stream
    #[error("read error: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// Line exceeded the reader capacity (non-fatal)
    #[error("line too long: exceeds {capacity} bytes, record truncated")]
    LineTooLong { capacity: usize },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink open error
    pub fn sink_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkOpenFailed {
            path: path.into(),
            source,
        }
    }

    /// Create sink write error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create line too long warning
    pub fn line_too_long(capacity: usize) -> Self {
        Self::LineTooLong { capacity }
    }

    /// Whether the run must stop streaming because of this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ReadFailed(_))
    }
}
