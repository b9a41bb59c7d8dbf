//! # disk-usage-report
//!
//! Report the disk usage of a directory and its immediate children, with each
//! size colored by how it compares to a warn and a critical threshold.
//!
//! The pipeline is linear: options are parsed once, the [`scanner`] measures
//! the target directory one level deep, [`output`] classifies and formats each
//! row, and a [`sink::Sink`] writes the lines to stdout or appends them to a file.

pub mod banner;
pub mod config;
pub mod entry;
pub mod output;
pub mod scanner;
pub mod severity;
pub mod sink;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use banner::{BANNER_TEXT, BannerRenderer, FigletBanner};
pub use config::{ReportOptions, ScanOptions, Thresholds};
pub use entry::DirectoryEntry;
pub use severity::{Palette, SeverityTier, classify};

use output::Report;
use scanner::Scanner;
use sink::Sink;

/// Scan `options.directory` and write the full report to the configured sink.
///
/// `palette` and `banner` are resolved by the caller once per run. When
/// `quiet` is set no progress spinner is drawn.
///
/// Returns the output file path when the report was appended to a file.
///
/// # Errors
///
/// Returns an error if the banner cannot be rendered, the target directory
/// cannot be read, the output file cannot be opened, or a write fails.
pub fn write_report(
    options: &ReportOptions,
    palette: Palette,
    banner: Option<&dyn BannerRenderer>,
    quiet: bool,
) -> Result<Option<PathBuf>> {
    let banner = banner.map(|renderer| renderer.render(BANNER_TEXT)).transpose()?;

    let entries = Scanner::new(options.scan.clone())
        .with_quiet(quiet)
        .scan_directory(&options.directory)?;

    let report = Report::new(&options.directory, &entries, options.thresholds, palette)
        .with_banner(banner);

    let mut sink = Sink::open(options.output.as_deref())?;
    let destination = sink.file_path().map(Path::to_path_buf);
    sink.write_lines(report.lines())?;
    sink.finish()?;

    Ok(destination)
}
