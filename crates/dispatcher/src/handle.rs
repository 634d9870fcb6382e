//! SinkEntry - a sink plus its one-way active flag and metrics

use std::sync::Arc;
use tracing::{debug, error, instrument};

use contracts::{ChunkSink, ContractError};

use crate::metrics::SinkMetrics;

/// Member of a [`SinkSet`](crate::SinkSet)
///
/// `active` only ever goes from `true` to `false`.
pub struct SinkEntry {
    /// Sink name
    name: String,
    /// The owned sink
    sink: Box<dyn ChunkSink>,
    /// Cleared on the first failed write
    active: bool,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
}

impl SinkEntry {
    /// Wrap a sink as an active entry
    pub fn new<S: ChunkSink + 'static>(sink: S) -> Self {
        Self::from_boxed(Box::new(sink))
    }

    pub fn from_boxed(sink: Box<dyn ChunkSink>) -> Self {
        Self {
            name: sink.name().to_string(),
            sink,
            active: true,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Write to the sink, deactivating it on failure
    ///
    /// Inactive entries are skipped and report `Ok(false)`.
    #[instrument(name = "sink_entry_write", skip(self, bytes), fields(sink = %self.name, len = bytes.len()))]
    pub fn write(&mut self, bytes: &[u8]) -> Result<bool, ContractError> {
        if !self.active {
            return Ok(false);
        }

        match self.sink.write(bytes) {
            Ok(()) => {
                self.metrics.record_write(bytes.len());
                Ok(true)
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                self.deactivate();
                Err(e)
            }
        }
    }

    /// Permanently mark this entry inactive
    pub fn deactivate(&mut self) {
        if self.active {
            debug!(sink = %self.name, "Sink deactivated");
        }
        self.active = false;
    }

    /// Close the sink regardless of its active state
    #[instrument(name = "sink_entry_close", skip(self), fields(sink = %self.name))]
    pub fn close(&mut self) -> Result<(), ContractError> {
        self.sink.close().inspect_err(|e| {
            error!(sink = %self.name, error = %e, "Close failed");
        })
    }
}

impl std::fmt::Debug for SinkEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkEntry")
            .field("name", &self.name)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
