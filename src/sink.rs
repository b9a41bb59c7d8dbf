//! Report destinations.
//!
//! A [`Sink`] is chosen once at startup: either standard output or a single
//! file that reports are appended to. Every line is written with its own
//! write call, so an interrupted run leaves whole lines behind.

use std::{
    fs::{File, OpenOptions},
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Where report lines go.
#[derive(Debug)]
pub enum Sink {
    /// Write to the process's standard output
    Stdout(Stdout),

    /// Append to a file, created if absent
    File {
        /// Path the report is appended to
        path: PathBuf,

        /// Open handle in append mode
        file: File,
    },
}

impl Sink {
    /// Open the sink for an optional output file.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created or opened for appending.
    pub fn open(destination: Option<&Path>) -> Result<Self> {
        let Some(path) = destination else {
            return Ok(Self::Stdout(io::stdout()));
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open output file {}", path.display()))?;

        Ok(Self::File {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the output file, if this sink writes to one.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Stdout(_) => None,
            Self::File { path, .. } => Some(path),
        }
    }

    /// Write a single line followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the underlying writer.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let text = format!("{line}\n");
        match self {
            Self::Stdout(stdout) => stdout.lock().write_all(text.as_bytes()),
            Self::File { file, .. } => file.write_all(text.as_bytes()),
        }
    }

    /// Write every line in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first write error.
    pub fn write_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.write_line(line.as_ref())
                .with_context(|| self.describe_failure())?;
        }
        Ok(())
    }

    /// Flush buffered output and close the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<()> {
        let flushed = match &mut self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::File { file, .. } => file.flush(),
        };
        flushed.with_context(|| self.describe_failure())
    }

    fn describe_failure(&self) -> String {
        match self {
            Self::Stdout(_) => "Failed to write report to stdout".to_string(),
            Self::File { path, .. } => format!("Failed to write report to {}", path.display()),
        }
    }
}
