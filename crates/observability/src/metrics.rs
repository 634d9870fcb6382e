//! Process-level counters
//!
//! Recorded through the `metrics` facade. Without an installed recorder
//! these calls are no-ops.

use metrics::{counter, gauge};

/// Record one replicated chunk and the sinks still active after it
pub fn record_chunk_replicated(bytes: usize, active_sinks: usize) {
    counter!("teeline_chunks_total").increment(1);
    counter!("teeline_bytes_total").increment(bytes as u64);
    gauge!("teeline_active_sinks").set(active_sinks as f64);
}

/// Record a sink deactivated by a failed write
pub fn record_sink_failure(sink: &str) {
    counter!("teeline_sink_failures_total", "sink" => sink.to_string()).increment(1);
}

/// Record a line record cut at the reader capacity
pub fn record_line_too_long() {
    counter!("teeline_line_too_long_total").increment(1);
}

/// Record the primary output failing
pub fn record_echo_failure() {
    counter!("teeline_echo_failures_total").increment(1);
}

/// Record the final exit status of a run
pub fn record_run_status(code: i32) {
    gauge!("teeline_exit_status").set(code as f64);
}
