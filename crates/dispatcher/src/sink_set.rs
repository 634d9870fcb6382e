//! SinkSet - ordered fan-out to file sinks

use std::path::PathBuf;

use tracing::{debug, error, info, instrument, warn};

use contracts::{ChunkSink, ContractError};

use crate::error::DispatcherError;
use crate::handle::SinkEntry;
use crate::metrics::MetricsSnapshot;
use crate::sinks::FileSink;

/// Result of fanning one chunk out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOutOutcome {
    /// Sinks that accepted the chunk
    pub delivered: usize,
    /// Sinks deactivated by this chunk, in insertion order
    pub newly_failed: Vec<String>,
}

/// Aggregated result of closing every sink
#[derive(Debug, Default)]
pub struct CloseReport {
    /// Sinks closed
    pub closed: usize,
    /// Close errors, reported but never raised
    pub errors: Vec<ContractError>,
}

impl CloseReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Ordered collection of sinks
///
/// Iteration order is insertion order, for both writes and diagnostics.
#[derive(Debug, Default)]
pub struct SinkSet {
    entries: Vec<SinkEntry>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file sink for every path, skipping the ones that fail
    ///
    /// # Errors
    /// [`DispatcherError::NoValidSinks`] when no destination could be opened
    #[instrument(name = "sink_set_open_all", skip(paths), fields(paths = paths.len()))]
    pub fn open_all(paths: &[PathBuf], append: bool) -> Result<Self, DispatcherError> {
        let mut set = Self::new();

        for path in paths {
            match FileSink::open(path, append) {
                Ok(sink) => set.add(sink),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Problem opening sink, skipping");
                }
            }
        }

        if set.is_empty() {
            return Err(DispatcherError::no_valid_sinks(paths.len()));
        }

        info!(sinks = set.len(), "Sink set ready");
        Ok(set)
    }

    /// Append a sink to the end of the set
    pub fn add<S: ChunkSink + 'static>(&mut self, sink: S) {
        self.entries.push(SinkEntry::new(sink));
    }

    /// Write a chunk to every active sink
    ///
    /// A failing sink is deactivated; the remaining sinks still receive the
    /// chunk.
    pub fn fan_out(&mut self, bytes: &[u8]) -> FanOutOutcome {
        let mut outcome = FanOutOutcome::default();

        for entry in self.entries.iter_mut().filter(|e| e.is_active()) {
            match entry.write(bytes) {
                Ok(true) => outcome.delivered += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(sink = %entry.name(), error = %e, "Write failed, sink deactivated");
                    outcome.newly_failed.push(entry.name().to_string());
                }
            }
        }

        outcome
    }

    /// Close every sink, active or not
    ///
    /// Never fails: errors are logged and collected in the report.
    #[instrument(name = "sink_set_close_all", skip(self), fields(sinks = self.entries.len()))]
    pub fn close_all(mut self) -> CloseReport {
        let mut report = CloseReport::default();

        for entry in &mut self.entries {
            match entry.close() {
                Ok(()) => report.closed += 1,
                Err(e) => report.errors.push(e),
            }
        }

        debug!(closed = report.closed, errors = report.errors.len(), "Sink set closed");
        report
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sinks still receiving writes
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_active()).count()
    }

    /// Sink names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.entries
            .iter()
            .map(|e| (e.name().to_string(), e.metrics().snapshot()))
            .collect()
    }
}
