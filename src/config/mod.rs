//! Configuration types for a report run.
//!
//! - [`ReportOptions`] - Everything a single run needs, built once at startup
//! - [`Thresholds`] - The warn/critical boundaries used to classify sizes
//! - [`ScanOptions`] - How the size collector measures directories
//! - [`FileConfig`] - Optional persistent defaults read from `config.toml`

pub mod file;
pub mod report;
pub mod scan;

pub use file::FileConfig;
pub use report::{ColorChoice, ReportOptions, Thresholds};
pub use scan::{ScanEngine, ScanOptions};
