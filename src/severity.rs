//! Severity tiers and the color palette used to display them.

use std::{fmt, io::IsTerminal};

use colored::Color;

use crate::config::{ColorChoice, Thresholds};

/// Severity of a reported size relative to the configured thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityTier {
    /// Below the warn threshold
    Ok,

    /// At or above warn, below critical
    Warn,

    /// At or above critical
    Crit,
}

impl SeverityTier {
    /// Classify a size against a [`Thresholds`] pair. See [`classify`].
    #[must_use]
    pub const fn of(size_mb: u64, thresholds: &Thresholds) -> Self {
        classify(size_mb, thresholds.warn_mb, thresholds.critical_mb)
    }

    /// Short uppercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Crit => "CRIT",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a size to its tier.
///
/// Boundaries are inclusive and land in the higher tier: `size >= critical` is
/// CRIT, otherwise `size >= warn` is WARN, otherwise OK.
///
/// # Examples
///
/// ```
/// # use disk_usage_report::severity::{classify, SeverityTier};
/// assert_eq!(classify(500, 100, 500), SeverityTier::Crit);
/// assert_eq!(classify(100, 100, 500), SeverityTier::Warn);
/// assert_eq!(classify(99, 100, 500), SeverityTier::Ok);
/// ```
#[must_use]
pub const fn classify(size_mb: u64, warn_mb: u64, critical_mb: u64) -> SeverityTier {
    if size_mb >= critical_mb {
        SeverityTier::Crit
    } else if size_mb >= warn_mb {
        SeverityTier::Warn
    } else {
        SeverityTier::Ok
    }
}

const RESET: &str = "\x1b[0m";

/// Colors applied to the size column, resolved once per run.
///
/// A palette is an explicit value handed to the formatter. A disabled palette
/// leaves text untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    enabled: bool,
    ok: Color,
    warn: Color,
    crit: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}

impl Palette {
    /// Palette that emits ANSI colors: green, yellow and red.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            enabled: true,
            ok: Color::Green,
            warn: Color::Yellow,
            crit: Color::Red,
        }
    }

    /// Palette that emits no escape sequences at all.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::colored()
        }
    }

    /// Resolve the palette for this run.
    ///
    /// `Auto` colorizes only when writing to stdout and the terminal supports
    /// color; a report appended to a file stays plain unless `Always` is given.
    #[must_use]
    pub fn resolve(choice: ColorChoice, to_file: bool) -> Self {
        let enabled = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                !to_file
                    && std::io::stdout().is_terminal()
                    && colored::control::SHOULD_COLORIZE.should_colorize()
            }
        };

        if enabled { Self::colored() } else { Self::plain() }
    }

    /// Color associated with a tier.
    #[must_use]
    pub const fn color(&self, tier: SeverityTier) -> Color {
        match tier {
            SeverityTier::Ok => self.ok,
            SeverityTier::Warn => self.warn,
            SeverityTier::Crit => self.crit,
        }
    }

    /// Wrap `text` in the tier's color and a reset sequence.
    #[must_use]
    pub fn paint(&self, text: &str, tier: SeverityTier) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("\x1b[{}m{text}{RESET}", self.color(tier).to_fg_str())
    }
}
