//! Report formatting.
//!
//! Lines are built from typed fields (path, size, tier). Only the size text is
//! styled, after padding has been computed on the plain text, so column widths
//! are the same with or without color.

use std::path::Path;

use chrono::{DateTime, Local};

use crate::{
    config::Thresholds,
    entry::DirectoryEntry,
    severity::{Palette, SeverityTier},
};

/// Minimum width of the left-aligned path column.
pub const PATH_COLUMN_WIDTH: usize = 50;

/// Minimum width of the right-aligned size column.
pub const SIZE_COLUMN_WIDTH: usize = 15;

/// Text of the size column before padding, e.g. `"120 MB"`.
#[must_use]
pub fn size_text(size_mb: u64) -> String {
    format!("{size_mb} MB")
}

/// Format one report row.
///
/// The path is left-aligned in at least [`PATH_COLUMN_WIDTH`] columns and the
/// size right-aligned in at least [`SIZE_COLUMN_WIDTH`]. Longer values are
/// never truncated. Only the `"<N> MB"` text is wrapped in the tier's color.
///
/// # Examples
///
/// ```
/// # use disk_usage_report::{entry::DirectoryEntry, output::format_line, severity::{Palette, SeverityTier}};
/// let line = format_line(&DirectoryEntry::new("logs", 7), SeverityTier::Ok, &Palette::plain());
/// assert_eq!(line.len(), 65);
/// assert!(line.ends_with("  7 MB"));
/// ```
#[must_use]
pub fn format_line(entry: &DirectoryEntry, tier: SeverityTier, palette: &Palette) -> String {
    let size = size_text(entry.size_mb);
    let padding = SIZE_COLUMN_WIDTH.saturating_sub(size.chars().count());

    format!(
        "{:<PATH_COLUMN_WIDTH$}{:padding$}{}",
        entry.path,
        "",
        palette.paint(&size, tier)
    )
}

/// Column header row, aligned with [`format_line`].
#[must_use]
pub fn column_header() -> String {
    format!("{:<PATH_COLUMN_WIDTH$}{:>SIZE_COLUMN_WIDTH$}", "Directory", "Size")
}

/// Horizontal rule spanning both columns.
#[must_use]
pub fn rule() -> String {
    "-".repeat(PATH_COLUMN_WIDTH + SIZE_COLUMN_WIDTH)
}

/// A fully composed report, ready to be handed to a sink line by line.
#[derive(Debug)]
pub struct Report<'a> {
    directory: &'a Path,
    entries: &'a [DirectoryEntry],
    thresholds: Thresholds,
    palette: Palette,
    banner: Option<String>,
    generated_at: DateTime<Local>,
}

impl<'a> Report<'a> {
    /// Create a report for `entries`, stamped with the current local time.
    #[must_use]
    pub fn new(
        directory: &'a Path,
        entries: &'a [DirectoryEntry],
        thresholds: Thresholds,
        palette: Palette,
    ) -> Self {
        Self {
            directory,
            entries,
            thresholds,
            palette,
            banner: None,
            generated_at: Local::now(),
        }
    }

    /// Prepend pre-rendered banner text.
    #[must_use]
    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }

    /// Override the generation timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Tier of every entry, in report order.
    pub fn tiers(&self) -> impl Iterator<Item = (&DirectoryEntry, SeverityTier)> {
        self.entries
            .iter()
            .map(|entry| (entry, SeverityTier::of(entry.size_mb, &self.thresholds)))
    }

    /// All lines of the report: banner, header, column headers and rows.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 8);

        if let Some(banner) = &self.banner {
            lines.extend(banner.trim_end_matches('\n').lines().map(str::to_string));
        }

        lines.push(format!("Disk usage report for {}", self.directory.display()));
        lines.push(format!(
            "Generated {} ({} >= {} MB, {} >= {} MB)",
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
            SeverityTier::Warn,
            self.thresholds.warn_mb,
            SeverityTier::Crit,
            self.thresholds.critical_mb
        ));
        lines.push(String::new());
        lines.push(column_header());
        lines.push(rule());

        lines.extend(
            self.tiers()
                .map(|(entry, tier)| format_line(entry, tier, &self.palette)),
        );

        lines
    }
}
