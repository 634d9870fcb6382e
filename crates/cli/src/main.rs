//! # teeline
//!
//! Command-line entry point.
//!
//! Provides:
//! - Argument and profile loading
//! - Diagnostics on stderr (stdout carries only replicated data)
//! - Interrupt handling with flush-and-close before exit

mod cli;
mod error;
mod run;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::debug;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "teeline starting");

    let status = run::run_replicator(&cli).await.inspect_err(|e| {
        tracing::error!(error = %e, "Command failed");
    })?;

    Ok(ExitCode::from(u8::try_from(status).unwrap_or(1)))
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let level = cli.log_level();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: level.unwrap_or("warn").to_string(),
        force_level: level.is_some(),
        colour: !cli.no_colour,
    })
}
