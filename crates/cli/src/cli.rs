//! CLI argument definitions using clap.

use clap::builder::{BoolishValueParser, FalseyValueParser};
use clap::{Parser, ValueEnum};
use config_loader::{ModeSelector, RunOptions};
use std::path::PathBuf;

/// teeline - copy standard input to each FILE, and also to standard output
#[derive(Parser, Debug)]
#[command(
    name = "teeline",
    author,
    version,
    about = "Copy standard input to each FILE, and also to standard output",
    long_about = "Reads standard input once and replicates it, in order, to every FILE \n\
                  and to standard output. A FILE that cannot be opened or written is \n\
                  skipped without affecting the others. Diagnostics go to standard error.\n\n\
                  Example: teeline -i -a file1.txt file2.txt"
)]
pub struct Cli {
    /// Destination files; paths containing glob characters are ignored
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Append to files if they already exist
    #[arg(short, long, env = "TEELINE_APPEND", value_parser = BoolishValueParser::new())]
    pub append: bool,

    /// Do not forward standard input to standard output
    #[arg(short = 'S', long = "no-stdout")]
    pub no_stdout: bool,

    /// Log interrupt signals instead of shutting down
    #[arg(
        short,
        long,
        env = "TEELINE_IGNORE_INTERRUPTS",
        value_parser = BoolishValueParser::new()
    )]
    pub ignore_interrupts: bool,

    /// Replication mode (auto: line mode for a terminal, block mode otherwise)
    #[arg(short, long, value_enum, env = "TEELINE_MODE")]
    pub mode: Option<ModeArg>,

    /// Read size in block mode
    #[arg(long, value_name = "BYTES")]
    pub block_size: Option<usize>,

    /// Longest line written whole in line mode
    #[arg(long, value_name = "BYTES")]
    pub line_capacity: Option<usize>,

    /// Profile file with defaults (TOML or JSON)
    #[arg(short, long, env = "TEELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable coloured diagnostics (any non-false NO_COLOR value also disables)
    #[arg(
        short = 'C',
        long = "no-colour",
        alias = "no-color",
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_colour: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "compact", env = "TEELINE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Command-line part of the run configuration
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            files: self.files.clone(),
            append: self.append,
            no_echo: self.no_stdout,
            ignore_interrupts: self.ignore_interrupts,
            mode: self.mode.map(Into::into),
            block_size: self.block_size,
            line_capacity: self.line_capacity,
        }
    }

    /// Log filter implied by -v / -q, if any was given
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Replication mode selector
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeArg {
    /// Line mode when stdin is a terminal, block mode otherwise
    #[default]
    Auto,
    /// Fixed-size blocks, byte-exact
    Block,
    /// Newline-delimited records
    Line,
}

impl From<ModeArg> for ModeSelector {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => ModeSelector::Auto,
            ModeArg::Block => ModeSelector::Block,
            ModeArg::Line => ModeSelector::Line,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
