//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as disk-usage measurement and megabyte rounding.

pub mod size;

pub use size::{SizeMeasure, UsageCounter, to_whole_mb};
