//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Every destination failed to open
    #[error("no valid files to save to ({attempted} attempted)")]
    NoValidSinks { attempted: usize },
}

impl DispatcherError {
    /// Create a no valid sinks error
    pub fn no_valid_sinks(attempted: usize) -> Self {
        Self::NoValidSinks { attempted }
    }
}
