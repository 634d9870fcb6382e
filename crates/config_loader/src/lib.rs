//! # Config Loader
//!
//! Builds the validated [`RunConfig`] handed to the replicator.
//!
//! Responsibilities:
//! - Parse optional TOML/JSON profile files
//! - Merge profile defaults with command-line options
//! - Reject glob and empty destination paths
//! - Validate sizes
//!
//! # Example
//!
//! ```no_run
//! use config_loader::{ConfigLoader, RunOptions};
//! use std::path::Path;
//!
//! let profile = ConfigLoader::load_profile(Path::new("teeline.toml")).unwrap();
//! let config = ConfigLoader::build(Some(profile), RunOptions::default(), false).unwrap();
//! println!("{} destinations", config.outputs.len());
//! ```

mod parser;
mod profile;
mod validator;

pub use contracts::RunConfig;
pub use parser::ConfigFormat;
pub use profile::{ModeSelector, Profile};
pub use validator::is_glob;

use contracts::{ContractError, DEFAULT_BLOCK_SIZE, DEFAULT_LINE_CAPACITY};
use std::path::{Path, PathBuf};

/// Options collected from the command line
///
/// `false` / `None` mean "not given" and fall back to the profile.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub files: Vec<PathBuf>,
    pub append: bool,
    pub no_echo: bool,
    pub ignore_interrupts: bool,
    pub mode: Option<ModeSelector>,
    pub block_size: Option<usize>,
    pub line_capacity: Option<usize>,
}

/// Configuration loader
///
/// Provides static methods to load profiles and build run configurations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a profile from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    pub fn load_profile(path: &Path) -> Result<Profile, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_profile_from_str(&content, format)
    }

    /// Load a profile from string
    pub fn load_profile_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<Profile, ContractError> {
        parser::parse(content, format)
    }

    /// Merge profile and command-line options into a validated config
    ///
    /// Profile outputs come first, then command-line files.
    ///
    /// # Errors
    /// Validation failure
    pub fn build(
        profile: Option<Profile>,
        options: RunOptions,
        stdin_is_terminal: bool,
    ) -> Result<RunConfig, ContractError> {
        let profile = profile.unwrap_or_default();

        let mut outputs = profile.outputs;
        outputs.extend(options.files);

        let mode = options
            .mode
            .or(profile.mode)
            .unwrap_or_default()
            .resolve(stdin_is_terminal);

        let config = RunConfig {
            outputs: validator::filter_destinations(outputs),
            append: options.append || profile.append.unwrap_or(false),
            echo: !options.no_echo && profile.echo.unwrap_or(true),
            ignore_interrupts: options.ignore_interrupts
                || profile.ignore_interrupts.unwrap_or(false),
            mode,
            block_size: options
                .block_size
                .or(profile.block_size)
                .unwrap_or(DEFAULT_BLOCK_SIZE),
            line_capacity: options
                .line_capacity
                .or(profile.line_capacity)
                .unwrap_or(DEFAULT_LINE_CAPACITY),
        };

        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize a profile to TOML string
    pub fn to_toml(profile: &Profile) -> Result<String, ContractError> {
        toml::to_string_pretty(profile)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
