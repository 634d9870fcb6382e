//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Profile file could not be loaded
    #[error("Failed to load profile {path}: {source}")]
    Profile {
        path: String,
        #[source]
        source: ContractError,
    },

    /// Merged configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(#[source] ContractError),

    /// Replication task did not complete
    #[error("Replication task failed: {message}")]
    Runtime { message: String },
}

impl CliError {
    pub fn profile(path: impl Into<String>, source: ContractError) -> Self {
        Self::Profile {
            path: path.into(),
            source,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
