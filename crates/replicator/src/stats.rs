//! Run statistics

use std::time::Duration;

use crate::state::{Phase, EXIT_SUCCESS};

/// Statistics from a replication run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Exit status for the process
    pub status: i32,

    /// Phase the replicator ended in
    pub phase: Phase,

    /// Chunks read from input
    pub chunks: u64,

    /// Bytes read from input
    pub bytes: u64,

    /// Line records cut at the line capacity
    pub truncated_lines: u64,

    /// Sinks opened at startup
    pub sinks_opened: usize,

    /// Sinks deactivated by a write failure
    pub sinks_failed: usize,

    /// Drain was pre-empted by the interrupt path
    pub interrupted: bool,

    /// Total duration of the run
    pub duration: Duration,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            status: EXIT_SUCCESS,
            phase: Phase::Idle,
            chunks: 0,
            bytes: 0,
            truncated_lines: 0,
            sinks_opened: 0,
            sinks_failed: 0,
            interrupted: false,
            duration: Duration::ZERO,
        }
    }
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.status == EXIT_SUCCESS
    }

    /// Throughput in bytes per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
