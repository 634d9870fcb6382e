//! Replication command implementation.

use std::io::{self, IsTerminal};

use config_loader::{ConfigLoader, RunConfig};
use replicator::{InterruptSignals, Replicator};
use tracing::{error, info};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Build the validated run configuration from CLI and optional profile
pub fn build_config(cli: &Cli, stdin_is_terminal: bool) -> Result<RunConfig> {
    let profile = match &cli.config {
        Some(path) => {
            info!(config = %path.display(), "Loading profile");
            let profile = ConfigLoader::load_profile(path)
                .map_err(|e| CliError::profile(path.display().to_string(), e))?;
            Some(profile)
        }
        None => None,
    };

    ConfigLoader::build(profile, cli.run_options(), stdin_is_terminal).map_err(CliError::Config)
}

/// Replicate stdin to the configured files and stdout
///
/// Returns the process exit status.
pub async fn run_replicator(cli: &Cli) -> Result<i32> {
    let config = build_config(cli, io::stdin().is_terminal())?;

    if config.outputs.is_empty() {
        error!("No files specified. See --help for usage.");
    }

    info!(
        outputs = config.outputs.len(),
        mode = ?config.mode,
        append = config.append,
        echo = config.echo,
        ignore_interrupts = config.ignore_interrupts,
        "Configuration loaded"
    );

    let replicator = Replicator::new(config);

    // Interrupt listener: drains through the shared controller, then exits
    let signals = InterruptSignals::install()
        .map_err(|e| CliError::runtime(format!("cannot install interrupt handlers: {e}")))?;
    let controller = replicator.controller();
    let listener = tokio::spawn(async move {
        match controller.listen(signals).await {
            Ok(code) => std::process::exit(code),
            Err(e) => error!(error = %e, "Interrupt listener stopped"),
        }
    });

    let summary = tokio::task::spawn_blocking(move || replicator.run(io::stdin(), io::stdout()))
        .await
        .map_err(|e| CliError::runtime(e.to_string()))?;

    listener.abort();

    info!(
        status = summary.status,
        bytes = summary.bytes,
        throughput = format!("{:.0} B/s", summary.throughput()),
        "teeline finished"
    );

    Ok(summary.status)
}
