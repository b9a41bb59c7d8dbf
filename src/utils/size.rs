//! Size measurement and rounding utilities.
//!
//! This module provides functions for measuring how much space a path takes
//! on disk and for converting byte counts into the whole-megabyte figures shown
//! in the report.

use std::{collections::HashSet, fs::Metadata, path::Path};

use walkdir::WalkDir;

/// Number of bytes in one reported megabyte (MiB, as `du -m` counts them).
pub const BYTES_PER_MB: u64 = 1_048_576;

/// How the size of a filesystem entry is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SizeMeasure {
    /// Space actually allocated on disk (block count).
    #[default]
    DiskUsage,

    /// Logical length of every entry, as `du --apparent-size` reports it.
    Apparent,
}

fn measured_size(metadata: &Metadata, measure: SizeMeasure) -> u64 {
    match measure {
        SizeMeasure::DiskUsage => allocated_bytes(metadata),
        SizeMeasure::Apparent => metadata.len(),
    }
}

#[cfg(unix)]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;

    metadata.blocks().saturating_mul(512)
}

#[cfg(not(unix))]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    metadata.len()
}

/// Running size tally for a single scan.
///
/// A file with several hard links is counted once, at the first link the
/// counter sees, no matter which directory the other links live in. Share one
/// counter across every directory of a scan so the root total agrees with the
/// per-directory rows.
#[derive(Debug, Default)]
pub struct UsageCounter {
    measure: SizeMeasure,

    /// `(device, inode)` of multiply-linked files already counted
    #[cfg_attr(not(unix), allow(dead_code))]
    seen: HashSet<(u64, u64)>,
}

impl UsageCounter {
    /// Create an empty counter for the given measure.
    #[must_use]
    pub fn new(measure: SizeMeasure) -> Self {
        Self {
            measure,
            seen: HashSet::new(),
        }
    }

    /// Size in bytes that a single entry contributes.
    ///
    /// Returns `0` for a further link to a file that was already counted.
    pub fn entry_size(&mut self, metadata: &Metadata) -> u64 {
        if self.first_sighting(metadata) {
            measured_size(metadata, self.measure)
        } else {
            0
        }
    }

    /// Calculate the total size of a directory and all its contents, in bytes.
    ///
    /// Recursively traverses the directory tree using `walkdir` without following
    /// symlinks, and sums the size of every entry found (the directory itself
    /// included). Errors for individual entries (permission denied, vanished
    /// files, etc.) are silently skipped so the function always returns a result.
    ///
    /// Returns `0` if the path does not exist or cannot be traversed at the root level.
    pub fn calculate_dir_size(&mut self, path: &Path) -> u64 {
        WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter_map(|entry| entry.metadata().ok())
            .map(|metadata| self.entry_size(&metadata))
            .fold(0u64, u64::saturating_add)
    }

    #[cfg(unix)]
    fn first_sighting(&mut self, metadata: &Metadata) -> bool {
        use std::os::unix::fs::MetadataExt;

        if metadata.is_dir() || metadata.nlink() <= 1 {
            return true;
        }
        self.seen.insert((metadata.dev(), metadata.ino()))
    }

    #[cfg(not(unix))]
    fn first_sighting(&mut self, _metadata: &Metadata) -> bool {
        true
    }
}

/// Convert a byte count to whole megabytes, rounding up.
///
/// Any non-empty amount reports at least `1`, matching the way `du -m` rounds.
///
/// # Examples
///
/// ```
/// # use disk_usage_report::utils::to_whole_mb;
/// assert_eq!(to_whole_mb(0), 0);
/// assert_eq!(to_whole_mb(1), 1);
/// assert_eq!(to_whole_mb(3 * 1_048_576), 3);
/// ```
#[must_use]
pub const fn to_whole_mb(bytes: u64) -> u64 {
    bytes.div_ceil(BYTES_PER_MB)
}
