//! Options for a single report run.
//!
//! A [`ReportOptions`] value is assembled once at startup from hardcoded
//! defaults, the config file and CLI overrides, and is never mutated afterwards.

use std::path::PathBuf;

use clap::ValueEnum;

use super::ScanOptions;

/// Default lower bound of the WARN tier, in MB.
pub const DEFAULT_WARN_MB: u64 = 100;

/// Default lower bound of the CRIT tier, in MB.
pub const DEFAULT_CRITICAL_MB: u64 = 500;

/// Size boundaries used to classify entries.
///
/// `critical_mb` is expected to be at least `warn_mb`; this is not enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    /// Entries of at least this many MB are WARN
    pub warn_mb: u64,

    /// Entries of at least this many MB are CRIT
    pub critical_mb: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn_mb: DEFAULT_WARN_MB,
            critical_mb: DEFAULT_CRITICAL_MB,
        }
    }
}

impl Thresholds {
    /// Whether the critical boundary sits below the warn boundary.
    ///
    /// Such a configuration still works but the WARN tier can never be reached.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.critical_mb < self.warn_mb
    }
}

/// When the size column should be colorized.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Default)]
pub enum ColorChoice {
    /// Colorize only when writing to a color-capable terminal
    #[default]
    Auto,

    /// Always emit color escape sequences, even into a file
    Always,

    /// Never emit color escape sequences
    Never,
}

/// Complete configuration of one report run.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Tier boundaries
    pub thresholds: Thresholds,

    /// Directory whose usage is reported
    pub directory: PathBuf,

    /// File the report is appended to; `None` writes to stdout
    pub output: Option<PathBuf>,

    /// Color policy for the size column
    pub color: ColorChoice,

    /// Whether the banner is rendered above the report
    pub banner: bool,

    /// Size collector options
    pub scan: ScanOptions,
}
