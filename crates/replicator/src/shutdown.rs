//! ShutdownController - single authoritative drain-and-close
//!
//! The main loop and the interrupt listener share the outputs through one
//! lock. Draining replaces them with a tombstone, so the close sequence runs
//! exactly once no matter which path gets there first, and a write can never
//! interleave with a close.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, instrument, warn};

use crate::outputs::{DrainReport, Outputs};
use crate::state::{RunState, EXIT_FAILURE};

/// What the interrupt path did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// Interrupts are ignored; logged only
    Ignored,
    /// Outputs drained; the process must exit with `code`
    Shutdown { code: i32 },
}

enum Slot {
    /// Nothing installed yet
    Empty,
    /// Outputs live and writable
    Live(Outputs),
    /// Drain already happened
    Drained,
}

struct Inner {
    slot: Mutex<Slot>,
    state: Arc<RunState>,
    drains: AtomicUsize,
}

/// Cloneable handle shared by the replicator and the interrupt listener
#[derive(Clone)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

impl ShutdownController {
    pub fn new(state: Arc<RunState>) -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot::Empty),
                state,
                drains: AtomicUsize::new(0),
            }),
        }
    }

    pub fn state(&self) -> &Arc<RunState> {
        &self.inner.state
    }

    // Shutdown must complete even if a writer panicked while holding the lock
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand the outputs over for streaming
    ///
    /// Returns `false` if a drain already happened; the outputs are then
    /// closed immediately.
    pub fn install(&self, outputs: Outputs) -> bool {
        let mut slot = self.lock();
        if matches!(*slot, Slot::Empty) {
            *slot = Slot::Live(outputs);
            return true;
        }
        drop(slot);

        warn!("Shutdown already in progress, closing outputs without streaming");
        outputs.drain();
        false
    }

    /// Run `f` against the live outputs, or return `None` once drained
    pub fn with_outputs<R>(&self, f: impl FnOnce(&mut Outputs) -> R) -> Option<R> {
        match &mut *self.lock() {
            Slot::Live(outputs) => Some(f(outputs)),
            Slot::Empty | Slot::Drained => None,
        }
    }

    /// Flush echo and close all sinks, at most once per run
    ///
    /// Returns `None` when another caller already drained.
    #[instrument(name = "shutdown_drain", skip(self))]
    pub fn drain(&self) -> Option<DrainReport> {
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Drained) {
            Slot::Live(outputs) => {
                self.inner.drains.fetch_add(1, Ordering::SeqCst);
                // Hold the lock through the close so no write can slip in
                let report = outputs.drain();
                drop(slot);
                Some(report)
            }
            Slot::Empty | Slot::Drained => None,
        }
    }

    /// Whether the drain sequence has run (or been pre-empted)
    pub fn is_drained(&self) -> bool {
        matches!(*self.lock(), Slot::Drained)
    }

    /// Number of times the close sequence actually ran
    pub fn drain_count(&self) -> usize {
        self.inner.drains.load(Ordering::SeqCst)
    }

    /// Handle one interrupt
    ///
    /// With interrupts ignored, SIGINT is only logged. SIGTERM always
    /// records the failure status and drains; the caller is expected to exit
    /// with the returned code.
    pub fn interrupt(&self, signal: InterruptSignal) -> InterruptOutcome {
        if self.inner.state.ignore_interrupts && signal.is_ignorable() {
            warn!(signal = signal.name(), "Got interrupt, ignoring");
            return InterruptOutcome::Ignored;
        }

        warn!(signal = signal.name(), "Got interrupt, flushing and closing outputs");
        self.inner.state.fail();
        if let Some(report) = self.drain() {
            info!(
                sinks = report.sinks_total,
                close_errors = report.close.errors.len(),
                "Outputs closed after interrupt"
            );
        }
        InterruptOutcome::Shutdown { code: EXIT_FAILURE }
    }

    /// Listen for interrupts until one must terminate the process
    ///
    /// Returns the exit code; the caller performs the actual exit.
    pub async fn listen(self, mut signals: InterruptSignals) -> io::Result<i32> {
        loop {
            let signal = signals.recv().await?;
            if let InterruptOutcome::Shutdown { code } = self.interrupt(signal) {
                return Ok(code);
            }
        }
    }
}

/// Signal that asks the run to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl InterruptSignal {
    pub fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }

    /// Whether `--ignore-interrupts` applies to this signal
    pub fn is_ignorable(self) -> bool {
        matches!(self, Self::Interrupt)
    }
}

/// Registered interrupt handlers
///
/// Registration happens in [`InterruptSignals::install`], so signals sent
/// after it returns are never lost.
pub struct InterruptSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl InterruptSignals {
    /// Register SIGINT and SIGTERM handlers; must be called inside a tokio runtime
    ///
    /// # Errors
    /// The OS refused to install a handler
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next signal
    #[cfg(unix)]
    pub async fn recv(&mut self) -> io::Result<InterruptSignal> {
        let received = tokio::select! {
            r = self.interrupt.recv() => r.map(|()| InterruptSignal::Interrupt),
            r = self.terminate.recv() => r.map(|()| InterruptSignal::Terminate),
        };
        received.ok_or_else(|| io::Error::other("signal stream closed"))
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> io::Result<InterruptSignal> {
        tokio::signal::ctrl_c().await?;
        Ok(InterruptSignal::Interrupt)
    }
}
