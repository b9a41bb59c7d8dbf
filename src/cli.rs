//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments and options using the
//! [clap](https://docs.rs/clap/) library. Parsing itself never touches the
//! filesystem: unknown flags and flags missing their value are rejected by clap
//! with a usage message before any scan starts.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use disk_usage_report::config::file::{FileConfig, expand_tilde};
use disk_usage_report::config::{ColorChoice, ReportOptions, ScanEngine, ScanOptions, Thresholds};
use disk_usage_report::utils::SizeMeasure;

/// Usage examples appended to `--help`.
const EXAMPLES: &str = "\
Examples:
  disk-usage-report                         Report on the current directory
  disk-usage-report -d /var/log             Report on /var/log
  disk-usage-report -w 200 -c 1000          Warn from 200 MB, critical from 1000 MB
  disk-usage-report -d ~ -o usage.txt       Append the report to usage.txt
  disk-usage-report --no-banner --color never";

/// Command-line arguments for controlling how sizes are measured.
#[derive(Parser)]
struct ScanningArgs {
    /// Backend used to measure directories
    ///
    /// `native` walks the tree in-process; `du` runs the host's `du -m -d 1`.
    #[arg(long, value_enum)]
    engine: Option<ScanEngine>,

    /// Measure apparent sizes (like `du --apparent-size`) instead of allocated disk blocks
    #[arg(long)]
    apparent_size: bool,

    /// Report entries that were skipped because they could not be read
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Command-line arguments for controlling the look of the report.
#[derive(Parser)]
struct DisplayArgs {
    /// When to colorize the size column
    ///
    /// `auto` colors terminal output only; reports appended to a file stay
    /// plain unless `always` is given.
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Do not render the banner (and do not require `figlet`)
    #[arg(long)]
    no_banner: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values act as
/// defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "disk-usage-report")]
#[command(
    about = "Report disk usage of a directory and its immediate children, color-coded by size"
)]
#[command(version)]
#[command(author)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Size in MB from which an entry is reported as WARN [default: 100]
    #[arg(short = 'w', long = "warn", value_name = "MB")]
    warn: Option<u64>,

    /// Size in MB from which an entry is reported as CRIT [default: 500]
    #[arg(short = 'c', long = "critical", value_name = "MB")]
    critical: Option<u64>,

    /// Directory to report on [default: current directory]
    #[arg(short = 'd', long, value_name = "PATH")]
    directory: Option<PathBuf>,

    /// Append the report to this file instead of printing it
    ///
    /// The file is created if it does not exist.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,

    /// Display options
    #[command(flatten)]
    display: DisplayArgs,
}

impl Cli {
    /// Resolve the warn and critical thresholds.
    ///
    /// Priority: CLI argument > config file > defaults (100 / 500 MB).
    #[must_use]
    pub fn thresholds(&self, config: &FileConfig) -> Thresholds {
        let defaults = Thresholds::default();

        Thresholds {
            warn_mb: self
                .warn
                .or(config.thresholds.warn)
                .unwrap_or(defaults.warn_mb),
            critical_mb: self
                .critical
                .or(config.thresholds.critical)
                .unwrap_or(defaults.critical_mb),
        }
    }

    /// Resolve the directory to report on.
    ///
    /// Priority: CLI argument > config file `directory` > current working directory.
    /// Tilde expansion is applied to paths originating from the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the current working directory is needed but cannot
    /// be determined.
    pub fn directory(&self, config: &FileConfig) -> Result<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }

        if let Some(dir) = &config.directory {
            return Ok(expand_tilde(dir));
        }

        std::env::current_dir().context("Failed to determine the current directory")
    }

    /// Resolve the output file, if any.
    ///
    /// Priority: CLI argument > config file `output` > stdout (`None`).
    #[must_use]
    pub fn output(&self, config: &FileConfig) -> Option<PathBuf> {
        self.output
            .clone()
            .or_else(|| config.output.as_deref().map(expand_tilde))
    }

    /// Extract scanning options from CLI args and config file.
    ///
    /// - **engine**: CLI > config > `native`
    /// - **apparent size** and **verbose**: CLI flag `||` config value `||` `false`
    #[must_use]
    pub fn scan_options(&self, config: &FileConfig) -> ScanOptions {
        let apparent =
            self.scanning.apparent_size || config.scanning.apparent_size.unwrap_or(false);

        ScanOptions {
            verbose: self.scanning.verbose || config.scanning.verbose.unwrap_or(false),
            engine: self
                .scanning
                .engine
                .or_else(|| {
                    config
                        .scanning
                        .engine
                        .as_ref()
                        .and_then(|s| ScanEngine::from_str(s, true).ok())
                })
                .unwrap_or_default(),
            measure: if apparent {
                SizeMeasure::Apparent
            } else {
                SizeMeasure::DiskUsage
            },
        }
    }

    /// Resolve the color policy.
    ///
    /// Priority: CLI argument > config file > `auto`.
    #[must_use]
    pub fn color(&self, config: &FileConfig) -> ColorChoice {
        self.display
            .color
            .or_else(|| {
                config
                    .display
                    .color
                    .as_ref()
                    .and_then(|s| ColorChoice::from_str(s, true).ok())
            })
            .unwrap_or_default()
    }

    /// Whether the banner should be rendered.
    ///
    /// `--no-banner` always wins; otherwise the config file decides, defaulting to `true`.
    #[must_use]
    pub fn banner(&self, config: &FileConfig) -> bool {
        !self.display.no_banner && config.display.banner.unwrap_or(true)
    }

    /// Assemble the complete, immutable options for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the target directory cannot be resolved.
    pub fn report_options(&self, config: &FileConfig) -> Result<ReportOptions> {
        Ok(ReportOptions {
            thresholds: self.thresholds(config),
            directory: self.directory(config)?,
            output: self.output(config),
            color: self.color(config),
            banner: self.banner(config),
            scan: self.scan_options(config),
        })
    }
}
