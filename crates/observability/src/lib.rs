//! # Observability
//!
//! Tracing initialisation and `metrics` counters.
//!
//! Diagnostics always go to stderr. Stdout is reserved for replicated data.
//!
//! ## Example
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig::default())?;
//! observability::record_chunk_replicated(chunk.len(), outputs.sinks().active_count());
//! ```

pub mod metrics;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_chunk_replicated, record_echo_failure, record_line_too_long, record_run_status,
    record_sink_failure,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Default filter when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Ignore `RUST_LOG` and force `default_log_level`
    pub force_level: bool,
    /// Colourised output (only honoured when stderr is a terminal)
    pub colour: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            default_log_level: "warn".to_string(),
            force_level: false,
            colour: true,
        }
    }
}

impl ObservabilityConfig {
    /// Whether ANSI colour codes should be emitted
    pub fn use_ansi(&self) -> bool {
        self.colour && std::io::stderr().is_terminal()
    }

    fn filter(&self) -> EnvFilter {
        if self.force_level {
            return EnvFilter::new(&self.default_log_level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

/// Initialise with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let ansi = config.use_ansi();

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        ansi,
        "Observability initialized"
    );

    Ok(())
}
