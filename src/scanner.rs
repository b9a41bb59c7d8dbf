//! Directory size collection.
//!
//! This module measures the scan root and each of its immediate child
//! directories, producing one [`DirectoryEntry`] per directory plus the root's
//! aggregate `.` row. Two engines are available: an in-process `walkdir`
//! traversal and the host's `du` utility.
//!
//! The scan is best-effort. Children that cannot be read are left out of the
//! report instead of failing the whole run.

use std::{fs, io, path::Path, process::Command, time::Duration};

use anyhow::{Context, Result, bail};
use humansize::{BINARY, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

use crate::{
    config::{ScanEngine, ScanOptions},
    entry::{DirectoryEntry, ROOT_DISPLAY_PATH, relative_display_path, sort_by_size_desc},
    utils::{SizeMeasure, UsageCounter, to_whole_mb},
};

/// Directory scanner producing the rows of a usage report.
#[derive(Debug)]
pub struct Scanner {
    /// Configuration options for scanning behavior
    scan_options: ScanOptions,

    /// When `true`, suppresses the progress spinner.
    quiet: bool,
}

impl Scanner {
    /// Create a new scanner with the specified options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use disk_usage_report::{config::ScanOptions, scanner::Scanner};
    /// let scanner = Scanner::new(ScanOptions::default());
    /// ```
    #[must_use]
    pub const fn new(scan_options: ScanOptions) -> Self {
        Self {
            scan_options,
            quiet: false,
        }
    }

    /// Enable or disable quiet mode (suppresses the progress spinner).
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Measure `root` and its immediate child directories.
    ///
    /// The returned entries are sorted by size, largest first. Equally sized
    /// entries keep their enumeration order, with the root's `.` row first.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a readable directory, or if the `du`
    /// engine is selected and `du` cannot be found or started.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<DirectoryEntry>> {
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        let progress = self.spinner(root);
        let mut skipped = Vec::new();

        let result = match self.scan_options.engine {
            ScanEngine::Native => self.scan_native(root, &progress, &mut skipped),
            ScanEngine::Du => self.scan_du(root, &mut skipped),
        };

        progress.finish_and_clear();

        for reason in &skipped {
            if self.scan_options.verbose {
                warn!("skipped {reason}");
            } else {
                debug!("skipped {reason}");
            }
        }

        let mut entries = result?;
        sort_by_size_desc(&mut entries);
        Ok(entries)
    }

    fn spinner(&self, root: &Path) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Scanning {}...", root.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Walk the immediate children of `root` in-process.
    ///
    /// One [`UsageCounter`] is shared by every child and the root total, so a
    /// hard-linked file is only counted in the first directory it shows up in.
    fn scan_native(
        &self,
        root: &Path,
        progress: &ProgressBar,
        skipped: &mut Vec<String>,
    ) -> Result<Vec<DirectoryEntry>> {
        let mut counter = UsageCounter::new(self.scan_options.measure);
        let children = fs::read_dir(root)
            .with_context(|| format!("Failed to read directory {}", root.display()))?;

        let mut root_total = fs::symlink_metadata(root)
            .map(|metadata| counter.entry_size(&metadata))
            .unwrap_or(0);
        let mut entries = Vec::new();

        for child in children {
            let child = match child {
                Ok(child) => child,
                Err(e) => {
                    skipped.push(format!("entry in {}: {e}", root.display()));
                    continue;
                }
            };

            let path = child.path();
            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    skipped.push(format!("{}: {e}", path.display()));
                    continue;
                }
            };

            if !metadata.is_dir() {
                root_total = root_total.saturating_add(counter.entry_size(&metadata));
                continue;
            }

            if !admit_child(&path, fs::read_dir(&path), skipped) {
                continue;
            }

            let bytes = counter.calculate_dir_size(&path);
            debug!("{} uses {}", path.display(), format_size(bytes, BINARY));

            root_total = root_total.saturating_add(bytes);
            entries.push(DirectoryEntry::new(
                relative_display_path(&path, root),
                to_whole_mb(bytes),
            ));
            progress.set_message(format!("Scanning... {} directories measured", entries.len()));
        }

        debug!("{} uses {}", root.display(), format_size(root_total, BINARY));
        entries.insert(0, DirectoryEntry::new(ROOT_DISPLAY_PATH, to_whole_mb(root_total)));

        Ok(entries)
    }

    /// Run `du -m -d 1` on `root` and parse its rows.
    ///
    /// `du` keeps going (and exits non-zero) when parts of the tree are
    /// unreadable, so its exit status is only logged.
    fn scan_du(&self, root: &Path, skipped: &mut Vec<String>) -> Result<Vec<DirectoryEntry>> {
        let du = which::which("du")
            .context("`du` was not found on PATH; install it or use `--engine native`")?;

        let mut command = Command::new(du);
        command.arg("-m").arg("-d").arg("1");
        if self.scan_options.measure == SizeMeasure::Apparent {
            command.arg("--apparent-size");
        }

        let output = command
            .arg(root)
            .output()
            .with_context(|| format!("Failed to run du on {}", root.display()))?;

        if !output.status.success() {
            debug!("du exited with {}", output.status);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            skipped.push(line.to_string());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_du_rows(
            &stdout,
            &root.to_string_lossy(),
            |path| fs::read_dir(root.join(path)).is_ok(),
            skipped,
        );

        Ok(entries)
    }
}

/// Decide whether a child directory gets its own row.
///
/// `listing` is the outcome of listing the child. A child that cannot be listed
/// is recorded in `skipped` and left out.
fn admit_child<T>(path: &Path, listing: io::Result<T>, skipped: &mut Vec<String>) -> bool {
    match listing {
        Ok(_) => true,
        Err(e) => {
            skipped.push(format!("{}: {e}", path.display()));
            false
        }
    }
}

/// Turn raw `du -m` output into report rows.
///
/// Blank lines are ignored. Lines with an invalid size, and children for which
/// `is_listable` returns `false`, are recorded in `skipped` instead. `du`
/// prints the root last; it is moved to the front so it stays ahead of equally
/// sized children.
fn parse_du_rows(
    stdout: &str,
    root: &str,
    is_listable: impl Fn(&str) -> bool,
    skipped: &mut Vec<String>,
) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();

    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        match DirectoryEntry::from_du_line(line, root) {
            Ok(entry) if !entry.is_root() && !is_listable(&entry.path) => {
                skipped.push(format!("{}: not readable", entry.path));
            }
            Ok(entry) => entries.push(entry),
            Err(e) => skipped.push(e.to_string()),
        }
    }

    if let Some(pos) = entries.iter().position(DirectoryEntry::is_root) {
        let root_entry = entries.remove(pos);
        entries.insert(0, root_entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MB: usize = 1_048_576;

    fn apparent_scanner(engine: ScanEngine) -> Scanner {
        Scanner::new(ScanOptions {
            verbose: false,
            engine,
            measure: SizeMeasure::Apparent,
        })
        .with_quiet(true)
    }

    fn create_file(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![0xA5u8; len]).unwrap();
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let tmp = TempDir::new().unwrap();
        let scanner = apparent_scanner(ScanEngine::Native);

        let err = scanner.scan_directory(&tmp.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_scan_rejects_file_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        create_file(&file, 10);

        assert!(apparent_scanner(ScanEngine::Native).scan_directory(&file).is_err());
    }

    #[test]
    fn test_native_scan_sizes_and_order() {
        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("small").join("f"), MB / 2);
        create_file(&tmp.path().join("large").join("deep").join("f"), 3 * MB + 1);
        create_file(&tmp.path().join("medium").join("f"), MB + MB / 2);
        create_file(&tmp.path().join("loose.bin"), MB);

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        let rows: Vec<_> = entries.iter().map(|e| (e.path.as_str(), e.size_mb)).collect();
        assert_eq!(rows, [(".", 7), ("large", 4), ("medium", 2), ("small", 1)]);
    }

    #[test]
    fn test_native_scan_files_only_root() {
        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("a.txt"), 100);

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        assert_eq!(entries, vec![DirectoryEntry::new(".", 1)]);
    }

    #[test]
    fn test_native_scan_empty_child_is_listed() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, [".", "empty"]);
        assert!(entries[1].size_mb <= 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_native_scan_counts_hard_links_once() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("a").join("data.bin");
        create_file(&original, 3 * MB - 64 * 1024);
        for n in 0..4 {
            fs::hard_link(&original, tmp.path().join("a").join(format!("link{n}"))).unwrap();
        }

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        assert_eq!(entries, vec![DirectoryEntry::new(".", 3), DirectoryEntry::new("a", 3)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_native_scan_hard_links_across_children() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("a").join("data.bin");
        create_file(&original, 3 * MB - 64 * 1024);
        fs::create_dir(tmp.path().join("b")).unwrap();
        fs::hard_link(&original, tmp.path().join("b").join("data.bin")).unwrap();

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        assert_eq!(entries[0], DirectoryEntry::new(".", 3));
        let mut children: Vec<_> = entries[1..].iter().map(|e| e.size_mb).collect();
        children.sort_unstable();
        assert_eq!(children.len(), 2);
        assert!(children[0] <= 1, "second link counted again: {entries:?}");
        assert_eq!(children[1], 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_native_scan_does_not_follow_symlinks() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        create_file(&outside.path().join("big"), 5 * MB);
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling"))
            .unwrap();

        let entries = apparent_scanner(ScanEngine::Native)
            .scan_directory(tmp.path())
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_root());
        assert_eq!(entries[0].size_mb, 1);
    }

    #[test]
    fn test_admit_child_rejects_failed_listing() {
        let mut skipped = Vec::new();
        let denied: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));

        assert!(!admit_child(Path::new("/data/locked"), denied, &mut skipped));
        assert!(admit_child(Path::new("/data/open"), Ok(()), &mut skipped));
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].starts_with("/data/locked: "));
    }

    #[test]
    fn test_parse_du_rows_skips_unreadable_and_invalid() {
        let stdout = "12\t/data/logs\n\
                      -4\t/data/broken\n\
                      \n\
                      3\t/data/locked\n\
                      1.5\t/data/fraction\n\
                      7\t/data/cache\n\
                      22\t/data\n";
        let mut skipped = Vec::new();

        let entries = parse_du_rows(stdout, "/data", |path| path != "locked", &mut skipped);

        assert_eq!(
            entries,
            vec![
                DirectoryEntry::new(".", 22),
                DirectoryEntry::new("logs", 12),
                DirectoryEntry::new("cache", 7),
            ]
        );
        assert_eq!(skipped.len(), 3);
        assert!(skipped.iter().any(|reason| reason == "locked: not readable"));
        assert!(skipped.iter().any(|reason| reason.contains("\"-4\"")));
        assert!(skipped.iter().any(|reason| reason.contains("\"1.5\"")));
    }

    #[test]
    fn test_parse_du_rows_never_drops_root() {
        let mut skipped = Vec::new();

        let entries = parse_du_rows("5\t/data\n", "/data", |_| false, &mut skipped);

        assert_eq!(entries, vec![DirectoryEntry::new(".", 5)]);
        assert!(skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_native_scan_skips_unreadable_child() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("open").join("f"), MB);
        let locked = tmp.path().join("locked");
        create_file(&locked.join("f"), MB);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read it anyway; nothing to observe then.
        let readable = fs::read_dir(&locked).is_ok();
        let entries = apparent_scanner(ScanEngine::Native).scan_directory(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        let paths: Vec<_> = entries.unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, [".", "open"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_du_scan_matches_native_shape() {
        if which::which("du").is_err() {
            return;
        }

        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("alpha").join("f"), 2 * MB);
        create_file(&tmp.path().join("beta").join("f"), 5 * MB);

        let entries = apparent_scanner(ScanEngine::Du)
            .scan_directory(tmp.path())
            .unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, [".", "beta", "alpha"]);
        assert!(entries[1].size_mb >= 5);
        assert!(entries[2].size_mb >= 2);
    }
}
