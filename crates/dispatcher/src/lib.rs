//! # Dispatcher
//!
//! Fan-out of replicated chunks to file sinks.
//!
//! Responsibilities:
//! - Open destination files in append or truncate mode
//! - Fan-out each chunk to every active sink, in argument order
//! - Isolate failing sinks without stopping the others
//! - Close every sink on drain

pub mod error;
pub mod handle;
pub mod metrics;
pub mod sink_set;
pub mod sinks;

pub use contracts::{ChunkSink, ContractError};
pub use error::DispatcherError;
pub use handle::SinkEntry;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sink_set::{CloseReport, FanOutOutcome, SinkSet};
pub use sinks::FileSink;
