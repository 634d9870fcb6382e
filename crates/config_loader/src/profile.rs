//! Profile file contents and the mode selector

use std::path::PathBuf;

use contracts::ReplicationMode;
use serde::{Deserialize, Serialize};

/// Mode as requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSelector {
    /// Line mode for interactive input, block mode for piped input
    #[default]
    Auto,
    Block,
    Line,
}

impl ModeSelector {
    pub fn resolve(self, stdin_is_terminal: bool) -> ReplicationMode {
        match self {
            Self::Auto if stdin_is_terminal => ReplicationMode::Line,
            Self::Auto | Self::Block => ReplicationMode::Block,
            Self::Line => ReplicationMode::Line,
        }
    }
}

/// Defaults loaded from a profile file
///
/// Every field is optional; command-line values take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Destinations written before any command-line files
    #[serde(default)]
    pub outputs: Vec<PathBuf>,

    pub append: Option<bool>,

    pub echo: Option<bool>,

    pub ignore_interrupts: Option<bool>,

    pub mode: Option<ModeSelector>,

    pub block_size: Option<usize>,

    pub line_capacity: Option<usize>,
}
