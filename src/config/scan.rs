//! Scanning configuration for the size collector.
//!
//! This module defines the options that control how the target directory is
//! measured and which backend performs the measurement.

use clap::ValueEnum;

use crate::utils::SizeMeasure;

/// Backend used to compute directory sizes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Default)]
pub enum ScanEngine {
    /// Walk the tree in-process with `walkdir`
    #[default]
    Native,

    /// Invoke the host `du` utility and parse its output
    Du,
}

/// Configuration for directory scanning behavior.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Whether to report skipped entries on stderr
    pub verbose: bool,

    /// Which backend measures the directories
    pub engine: ScanEngine,

    /// Whether sizes are allocated blocks or apparent file lengths
    pub measure: SizeMeasure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_default() {
        let scan_opts = ScanOptions::default();

        assert!(!scan_opts.verbose);
        assert_eq!(scan_opts.engine, ScanEngine::Native);
        assert_eq!(scan_opts.measure, SizeMeasure::DiskUsage);
    }

    #[test]
    fn test_scan_engine_from_str() {
        assert_eq!(ScanEngine::from_str("du", true), Ok(ScanEngine::Du));
        assert_eq!(ScanEngine::from_str("NATIVE", true), Ok(ScanEngine::Native));
        assert!(ScanEngine::from_str("ncdu", true).is_err());
    }
}
