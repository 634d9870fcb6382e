//! Destination and size validation
//!
//! Rules:
//! - paths containing glob metacharacters are rejected (not expanded)
//! - empty paths are rejected
//! - block_size > 0
//! - line_capacity > 0

use std::path::PathBuf;

use contracts::{ContractError, RunConfig};
use tracing::warn;

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

/// Whether a path looks like an unexpanded glob
pub fn is_glob(path: &std::path::Path) -> bool {
    path.to_string_lossy().contains(GLOB_CHARS)
}

/// Drop glob and empty paths, keeping the order of the rest
pub fn filter_destinations(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| {
            if path.as_os_str().is_empty() {
                warn!("Ignoring empty path");
                return false;
            }
            if is_glob(path) {
                warn!(path = %path.display(), "Ignoring globbing path");
                return false;
            }
            true
        })
        .collect()
}

/// Validate a merged run configuration
///
/// Returns the first error encountered. An empty destination list is not an
/// error here; the replicator reports it.
pub fn validate(config: &RunConfig) -> Result<(), ContractError> {
    if config.block_size == 0 {
        return Err(ContractError::config_validation(
            "block_size",
            "block_size must be > 0",
        ));
    }
    if config.line_capacity == 0 {
        return Err(ContractError::config_validation(
            "line_capacity",
            "line_capacity must be > 0",
        ));
    }
    Ok(())
}
