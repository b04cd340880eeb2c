//! Configuration management for `incompat.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section      # [scan], [trigger], [report]
//! ├── types/       # Utility types
//! │   ├── error    # ConfigError, ConfigDiagnostics
//! │   ├── field    # FieldPath
//! │   └── handle   # Global config handle
//! └── mod.rs       # EngineConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                     |
//! |-------------|---------------------------------------------|
//! | `[scan]`    | Target encoding label, substitutes on/off   |
//! | `[trigger]` | Debounce window for edit bursts             |
//! | `[report]`  | CLI table size                              |

mod section;
pub mod types;
mod util;

pub use section::{ReportConfig, ScanConfig, TriggerConfig};
pub use types::{
    ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config,
};
pub use util::find_config_file;

use crate::cli::{Cli, Commands, ScanArgs};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing incompat.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file, existing or not (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl EngineConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; a missing file means
    /// defaults. CLI flags override file values.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.config_path = config_path;
        config.cli = Some(cli);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Load configuration from file path with unknown field detection.
    ///
    /// Unknown fields are reported and ignored.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Scan { args, .. } | Commands::Watch { args } => self.apply_scan_args(args),
        }
    }

    fn apply_scan_args(&mut self, args: &ScanArgs) {
        Self::update_option(&mut self.scan.encoding, args.encoding.as_ref());
        Self::update_option(&mut self.scan.substitutes, args.substitutes.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.scan.validate(&mut diag);
        self.trigger.validate(&mut diag);
        self.report.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> EngineConfig {
    let (parsed, ignored) = EngineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
