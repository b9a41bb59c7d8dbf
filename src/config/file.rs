//! Configuration file support for persistent defaults.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/disk-usage-report/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! directory = "~/Projects"
//! # output = "~/reports/disk-usage.txt"
//!
//! [thresholds]
//! warn = 100
//! critical = 500
//!
//! [scanning]
//! engine = "native"     # or "du"
//! apparent_size = false
//! verbose = false
//!
//! [display]
//! color = "auto"        # "always" or "never"
//! banner = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default directory to report on
    pub directory: Option<PathBuf>,

    /// Default file to append reports to
    pub output: Option<PathBuf>,

    /// Tier boundaries
    #[serde(default)]
    pub thresholds: FileThresholdConfig,

    /// Scanning options
    #[serde(default)]
    pub scanning: FileScanConfig,

    /// Display options
    #[serde(default)]
    pub display: FileDisplayConfig,
}

/// Threshold values from the configuration file, in MB.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileThresholdConfig {
    /// Lower bound of the WARN tier
    pub warn: Option<u64>,

    /// Lower bound of the CRIT tier
    pub critical: Option<u64>,
}

/// Scanning options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileScanConfig {
    /// Size backend (`"native"` or `"du"`)
    pub engine: Option<String>,

    /// Whether to measure apparent sizes instead of disk usage
    pub apparent_size: Option<bool>,

    /// Whether to show verbose output
    pub verbose: Option<bool>,
}

/// Display options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileDisplayConfig {
    /// Color policy (`"auto"`, `"always"`, `"never"`)
    pub color: Option<String>,

    /// Whether to render the banner. Defaults to `true` when absent.
    pub banner: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use disk_usage_report::config::file::expand_tilde;
/// let absolute = PathBuf::from("/absolute/path");
/// assert_eq!(expand_tilde(&absolute), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/disk-usage-report/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// Returns `None` if the config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("disk-usage-report").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// contains invalid TOML or unexpected fields.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }
}
