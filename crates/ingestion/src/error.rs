//! Ingestion error types

use contracts::ContractError;
use thiserror::Error;

/// Reader configuration errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Block size of zero would never make progress
    #[error("block size must be > 0")]
    ZeroBlockSize,

    /// Line capacity of zero would never make progress
    #[error("line capacity must be > 0")]
    ZeroLineCapacity,
}

impl From<IngestionError> for ContractError {
    fn from(e: IngestionError) -> Self {
        let field = match e {
            IngestionError::ZeroBlockSize => "block_size",
            IngestionError::ZeroLineCapacity => "line_capacity",
        };
        ContractError::config_validation(field, e.to_string())
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
