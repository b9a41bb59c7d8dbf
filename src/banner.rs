//! Banner rendering.
//!
//! The report core only knows the [`BannerRenderer`] trait. The shipped
//! implementation shells out to `figlet`, which is located once at startup so a
//! missing tool is reported before any scanning happens.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;

/// Name of the external banner tool.
pub const FIGLET: &str = "figlet";

/// Text rendered as the report banner.
pub const BANNER_TEXT: &str = "Disk Usage";

/// Errors raised while locating or running a banner tool.
#[derive(Debug, Error)]
pub enum BannerError {
    /// The tool is not installed or not on `PATH`.
    #[error("`{tool}` is required to render the banner but was not found on PATH (use --no-banner to skip it)")]
    ToolMissing {
        tool: &'static str,
        #[source]
        source: which::Error,
    },

    /// The tool could not be started.
    #[error("failed to run `{tool}`: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure.
    #[error("`{tool}` exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Something that turns a short title into banner text.
pub trait BannerRenderer {
    /// Render `text`, returning the (possibly multi-line) banner.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&self, text: &str) -> Result<String, BannerError>;
}

/// Renders banners with the `figlet` command.
#[derive(Debug, Clone)]
pub struct FigletBanner {
    program: PathBuf,
}

impl FigletBanner {
    /// Locate `figlet` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`BannerError::ToolMissing`] if it cannot be found.
    pub fn locate() -> Result<Self, BannerError> {
        which::which(FIGLET)
            .map(Self::with_program)
            .map_err(|source| BannerError::ToolMissing {
                tool: FIGLET,
                source,
            })
    }

    /// Use an explicit `figlet` executable.
    #[must_use]
    pub const fn with_program(program: PathBuf) -> Self {
        Self { program }
    }

    /// Path of the executable that will be run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl BannerRenderer for FigletBanner {
    fn render(&self, text: &str) -> Result<String, BannerError> {
        let output = Command::new(&self.program)
            .arg(text)
            .output()
            .map_err(|source| BannerError::Spawn {
                tool: FIGLET,
                source,
            })?;

        if !output.status.success() {
            return Err(BannerError::Failed {
                tool: FIGLET,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Boxed;

    impl BannerRenderer for Boxed {
        fn render(&self, text: &str) -> Result<String, BannerError> {
            let rule = "*".repeat(text.len() + 4);
            Ok(format!("{rule}\n* {text} *\n{rule}\n"))
        }
    }

    #[test]
    fn test_renderer_is_object_safe() {
        let renderer: &dyn BannerRenderer = &Boxed;
        let banner = renderer.render("Hi").unwrap();

        assert_eq!(banner, "******\n* Hi *\n******\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let banner = FigletBanner::with_program(PathBuf::from("/nonexistent/figlet-binary"));

        assert!(matches!(
            banner.render(BANNER_TEXT),
            Err(BannerError::Spawn { .. })
        ));
    }

    #[test]
    fn test_locate_agrees_with_path_lookup() {
        let located = FigletBanner::locate();

        match which::which(FIGLET) {
            Ok(path) => assert_eq!(located.unwrap().program(), path),
            Err(_) => {
                let err = located.unwrap_err();
                assert!(matches!(err, BannerError::ToolMissing { .. }));
                assert!(err.to_string().contains("--no-banner"));
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_reported() {
        let banner = FigletBanner::with_program(PathBuf::from("false"));

        assert!(matches!(
            banner.render(BANNER_TEXT),
            Err(BannerError::Failed { .. })
        ));
    }
}
