//! # Replicator
//!
//! Multi-destination stream replication core.
//!
//! Responsibilities:
//! - Drive input → sink set (+ optional echo) through
//!   `Idle → Streaming → Draining → Terminated`
//! - Share outputs between the main loop and the interrupt listener
//! - Run the drain-and-close sequence exactly once
//!
//! ## Usage Example
//!
//! ```ignore
//! use replicator::Replicator;
//!
//! let replicator = Replicator::new(config);
//! let controller = replicator.controller();
//! tokio::spawn(controller.listen(InterruptSignals::install()?));
//!
//! let summary = replicator.run(std::io::stdin(), std::io::stdout());
//! std::process::exit(summary.status);
//! ```

mod outputs;
mod replicator;
mod shutdown;
mod state;
mod stats;

// Re-exports
pub use contracts::{ReplicationMode, RunConfig};
pub use outputs::{DrainReport, EchoOutput, Outputs};
pub use replicator::Replicator;
pub use shutdown::{InterruptOutcome, InterruptSignal, InterruptSignals, ShutdownController};
pub use state::{Phase, RunState, EXIT_FAILURE, EXIT_SUCCESS};
pub use stats::RunSummary;
