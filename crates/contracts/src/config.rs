//! Run configuration handed to the replicator core
//!
//! Built and validated by `config_loader`; the core trusts it as-is.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default block size for block-mode reads
pub const DEFAULT_BLOCK_SIZE: usize = 2048;

/// Default maximum record length in line mode
pub const DEFAULT_LINE_CAPACITY: usize = 4096;

/// Replication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationMode {
    /// Fixed-size chunks, byte-exact replication
    #[default]
    Block,
    /// Newline-delimited records with newline normalisation
    Line,
}

/// Validated run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Destination paths, in argument order
    pub outputs: Vec<PathBuf>,

    /// Append to existing files instead of truncating them
    #[serde(default)]
    pub append: bool,

    /// Forward input to the primary output
    #[serde(default = "default_echo")]
    pub echo: bool,

    /// Log interrupts instead of shutting down on them
    #[serde(default)]
    pub ignore_interrupts: bool,

    /// Block or line replication
    #[serde(default)]
    pub mode: ReplicationMode,

    /// Read size in block mode
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Maximum record length in line mode
    #[serde(default = "default_line_capacity")]
    pub line_capacity: usize,
}

fn default_echo() -> bool {
    true
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_line_capacity() -> usize {
    DEFAULT_LINE_CAPACITY
}

impl RunConfig {
    /// Config with defaults for the given destinations
    pub fn new(outputs: Vec<PathBuf>) -> Self {
        Self {
            outputs,
            append: false,
            echo: default_echo(),
            ignore_interrupts: false,
            mode: ReplicationMode::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            line_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}
