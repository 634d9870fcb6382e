//! Reader configuration and counters

use contracts::{ReplicationMode, RunConfig, DEFAULT_BLOCK_SIZE, DEFAULT_LINE_CAPACITY};

use crate::error::{IngestionError, Result};

/// Input reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Block or line chunking
    pub mode: ReplicationMode,

    /// Read size in block mode, and refill size in line mode
    pub block_size: usize,

    /// Longest record emitted whole in line mode
    pub line_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            mode: ReplicationMode::Block,
            block_size: DEFAULT_BLOCK_SIZE,
            line_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}

impl ReaderConfig {
    /// Line mode with the given capacity
    pub fn lines(line_capacity: usize) -> Self {
        Self {
            mode: ReplicationMode::Line,
            line_capacity,
            ..Default::default()
        }
    }

    /// Block mode with the given block size
    pub fn blocks(block_size: usize) -> Self {
        Self {
            mode: ReplicationMode::Block,
            block_size,
            ..Default::default()
        }
    }

    /// Reject sizes that would stall the reader
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(IngestionError::ZeroBlockSize);
        }
        if self.line_capacity == 0 {
            return Err(IngestionError::ZeroLineCapacity);
        }
        Ok(())
    }
}

impl From<&RunConfig> for ReaderConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            mode: config.mode,
            block_size: config.block_size,
            line_capacity: config.line_capacity,
        }
    }
}

/// Reader counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Chunks produced
    pub chunks: u64,

    /// Payload bytes produced (line terminators excluded)
    pub bytes: u64,

    /// Records cut at the line capacity
    pub truncated_lines: u64,
}
