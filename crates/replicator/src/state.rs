//! Process-wide run state

use std::sync::atomic::{AtomicI32, Ordering};

use contracts::RunConfig;

/// Nominal exit status
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status after a fatal construction or read error, or an interrupt
pub const EXIT_FAILURE: i32 = 1;

/// Replicator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sinks being constructed
    Idle,
    /// Reading and fanning out chunks
    Streaming,
    /// Flushing echo and closing sinks
    Draining,
    /// Done; exit status is final
    Terminated,
}

/// Single instance per run, shared by the main loop and the interrupt path
#[derive(Debug)]
pub struct RunState {
    pub echo_enabled: bool,
    pub ignore_interrupts: bool,
    /// Accumulated exit status
    status: AtomicI32,
}

impl RunState {
    pub fn new(echo_enabled: bool, ignore_interrupts: bool) -> Self {
        Self {
            echo_enabled,
            ignore_interrupts,
            status: AtomicI32::new(EXIT_SUCCESS),
        }
    }

    pub fn status(&self) -> i32 {
        self.status.load(Ordering::SeqCst)
    }

    /// Record a fatal condition. The status never returns to success.
    pub fn fail(&self) {
        self.status.store(EXIT_FAILURE, Ordering::SeqCst);
    }
}

impl From<&RunConfig> for RunState {
    fn from(config: &RunConfig) -> Self {
        Self::new(config.echo, config.ignore_interrupts)
    }
}
