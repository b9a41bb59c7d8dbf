//! Reported directory rows.
//!
//! A [`DirectoryEntry`] is one row of the report: a path relative to the scan
//! root and its aggregate size in whole megabytes. Entries are produced fresh by
//! each scan and never mutated.

use std::path::Path;

use thiserror::Error;

/// Display path used for the scan root's own aggregate row.
pub const ROOT_DISPLAY_PATH: &str = ".";

/// A directory (or the scan root) and its aggregate size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Path relative to the scan root; `.` for the root itself
    pub path: String,

    /// Aggregate size, rounded up to whole MB
    pub size_mb: u64,
}

/// Reasons a raw size reading cannot become a [`DirectoryEntry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The size field is not a non-negative integer.
    #[error("invalid size {size:?} for {path:?}")]
    InvalidSize { size: String, path: String },

    /// The line does not have the `SIZE<TAB>PATH` shape.
    #[error("malformed usage line {0:?}")]
    MalformedLine(String),
}

impl DirectoryEntry {
    /// Create an entry from an already-normalized display path.
    #[must_use]
    pub fn new(path: impl Into<String>, size_mb: u64) -> Self {
        Self {
            path: path.into(),
            size_mb,
        }
    }

    /// Whether this entry is the scan root's aggregate row.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == ROOT_DISPLAY_PATH
    }

    /// Parse one line of `du -m` output (`SIZE<TAB>PATH`).
    ///
    /// The path is normalized against `root` with [`normalize_display_path`].
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::MalformedLine`] when there is no tab separator and
    /// [`EntryError::InvalidSize`] when the size is not a non-negative integer.
    pub fn from_du_line(line: &str, root: &str) -> Result<Self, EntryError> {
        let (size, path) = line
            .split_once('\t')
            .ok_or_else(|| EntryError::MalformedLine(line.to_string()))?;

        let size_mb = parse_size_mb(size.trim()).ok_or_else(|| EntryError::InvalidSize {
            size: size.to_string(),
            path: path.to_string(),
        })?;

        Ok(Self::new(normalize_display_path(path, root), size_mb))
    }
}

/// Parse a whole-MB size, rejecting signs, fractions and empty strings.
fn parse_size_mb(size: &str) -> Option<u64> {
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    size.parse().ok()
}

/// Turn a scanned path into the path shown in the report.
///
/// Strips the `root` prefix, then any leading `./` or `/` components. The root
/// itself becomes `.`.
///
/// # Examples
///
/// ```
/// # use disk_usage_report::entry::normalize_display_path;
/// assert_eq!(normalize_display_path("/srv/data/logs", "/srv/data"), "logs");
/// assert_eq!(normalize_display_path("./cache", "."), "cache");
/// assert_eq!(normalize_display_path("/srv/data", "/srv/data"), ".");
/// ```
#[must_use]
pub fn normalize_display_path(path: &str, root: &str) -> String {
    let mut rest = path.strip_prefix(root).unwrap_or(path);

    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }

    if rest.is_empty() || rest == ROOT_DISPLAY_PATH {
        ROOT_DISPLAY_PATH.to_string()
    } else {
        rest.to_string()
    }
}

/// Display path of `path` relative to `root`, for natively scanned entries.
#[must_use]
pub fn relative_display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).map_or_else(
        |_| normalize_display_path(&path.to_string_lossy(), &root.to_string_lossy()),
        |relative| normalize_display_path(&relative.to_string_lossy(), ""),
    )
}

/// Sort entries by size, largest first.
///
/// The sort is stable, so equally sized entries keep their enumeration order.
pub fn sort_by_size_desc(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| b.size_mb.cmp(&a.size_mb));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_strips_root_prefix() {
        assert_eq!(normalize_display_path("/srv/data/logs", "/srv/data"), "logs");
        assert_eq!(normalize_display_path("/srv/data/a/b", "/srv/data/"), "a/b");
    }

    #[test]
    fn test_normalize_root_becomes_dot() {
        assert_eq!(normalize_display_path("/srv/data", "/srv/data"), ".");
        assert_eq!(normalize_display_path(".", "."), ".");
        assert_eq!(normalize_display_path("", ""), ".");
    }

    #[test]
    fn test_normalize_leading_dot_slash() {
        assert_eq!(normalize_display_path("./cache", "."), "cache");
        assert_eq!(normalize_display_path("./cache", "/elsewhere"), "cache");
        assert_eq!(normalize_display_path("././x", ""), "x");
    }

    #[test]
    fn test_normalize_keeps_hidden_names() {
        assert_eq!(normalize_display_path("./.cache", "."), ".cache");
        assert_eq!(normalize_display_path("/home/me/.git", "/home/me"), ".git");
    }

    #[test]
    fn test_relative_display_path() {
        let root = PathBuf::from("/tmp/scan");
        assert_eq!(relative_display_path(&root.join("docs"), &root), "docs");
        assert_eq!(relative_display_path(&root, &root), ".");
    }

    #[test]
    fn test_from_du_line() {
        let entry = DirectoryEntry::from_du_line("120\t/data/b", "/data").unwrap();
        assert_eq!(entry, DirectoryEntry::new("b", 120));

        let root = DirectoryEntry::from_du_line("780\t/data", "/data").unwrap();
        assert!(root.is_root());
        assert_eq!(root.size_mb, 780);
    }

    #[test]
    fn test_from_du_line_path_with_tab_kept_whole() {
        let entry = DirectoryEntry::from_du_line("3\t./odd\tname", ".").unwrap();
        assert_eq!(entry.path, "odd\tname");
    }

    #[test]
    fn test_from_du_line_invalid_size() {
        for bad in ["-4\t./x", "abc\t./x", "1.5\t./x", "\t./x", "+3\t./x"] {
            assert!(
                matches!(
                    DirectoryEntry::from_du_line(bad, "."),
                    Err(EntryError::InvalidSize { .. })
                ),
                "expected invalid size for {bad:?}"
            );
        }
    }

    #[test]
    fn test_from_du_line_malformed() {
        assert_eq!(
            DirectoryEntry::from_du_line("du: cannot read directory", "."),
            Err(EntryError::MalformedLine(
                "du: cannot read directory".to_string()
            ))
        );
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut entries = vec![
            DirectoryEntry::new("a", 60),
            DirectoryEntry::new("tie1", 120),
            DirectoryEntry::new("c", 600),
            DirectoryEntry::new("tie2", 120),
        ];
        sort_by_size_desc(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(order, ["c", "tie1", "tie2", "a"]);
    }
}
