//! Outputs - the sink set plus the optional primary echo

use std::io::{BufWriter, Write};

use dispatcher::{CloseReport, FanOutOutcome, SinkSet};
use tracing::{debug, error, warn};

/// Buffered primary output (stdout in the binary)
pub struct EchoOutput {
    writer: BufWriter<Box<dyn Write + Send>>,
    active: bool,
}

impl EchoOutput {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: BufWriter::new(Box::new(writer)),
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Forward bytes unmodified. A failure disables echo for the rest of the run.
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        if !self.active {
            return false;
        }
        if let Err(e) = self.writer.write_all(bytes).and_then(|()| self.writer.flush()) {
            warn!(error = %e, "Echo to primary output failed, disabling echo");
            observability::record_echo_failure();
            self.active = false;
            return false;
        }
        true
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            error!(error = %e, "Flush of primary output failed");
        }
    }
}

/// Result of the drain-and-close sequence
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Sinks in the set at drain time
    pub sinks_total: usize,
    /// Sinks that were still active at drain time
    pub sinks_active: usize,
    /// Per-sink close results
    pub close: CloseReport,
}

/// Everything the main loop and the interrupt path both touch
pub struct Outputs {
    sinks: SinkSet,
    echo: Option<EchoOutput>,
}

impl Outputs {
    pub fn new(sinks: SinkSet, echo: Option<EchoOutput>) -> Self {
        Self { sinks, echo }
    }

    pub fn sinks(&self) -> &SinkSet {
        &self.sinks
    }

    /// Fan a wire-ready chunk out to every active sink, then echo it
    pub fn replicate(&mut self, bytes: &[u8]) -> FanOutOutcome {
        let outcome = self.sinks.fan_out(bytes);
        for name in &outcome.newly_failed {
            observability::record_sink_failure(name);
        }

        if let Some(echo) = self.echo.as_mut() {
            echo.write(bytes);
        }

        outcome
    }

    /// Flush the echo buffer and close every sink
    pub fn drain(mut self) -> DrainReport {
        if let Some(echo) = self.echo.as_mut() {
            echo.flush();
        }

        let sinks_total = self.sinks.len();
        let sinks_active = self.sinks.active_count();
        let close = self.sinks.close_all();

        debug!(
            sinks_total,
            sinks_active,
            close_errors = close.errors.len(),
            "Outputs drained"
        );

        DrainReport {
            sinks_total,
            sinks_active,
            close,
        }
    }
}
