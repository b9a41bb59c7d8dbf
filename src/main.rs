//! # disk-usage-report
//!
//! A small CLI that reports the disk usage of a directory and each of its
//! immediate children, coloring every size by severity.
//!
//! ## Usage
//!
//! ```bash
//! # Report on the current directory with the default thresholds (100 / 500 MB)
//! disk-usage-report
//!
//! # Custom thresholds and target
//! disk-usage-report --warn 200 --critical 1000 --directory /var
//!
//! # Append the report to a file
//! disk-usage-report -o usage.txt
//! ```

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use disk_usage_report::{
    BannerRenderer, FigletBanner, Palette,
    config::{
        FileConfig,
        report::{DEFAULT_CRITICAL_MB, DEFAULT_WARN_MB},
    },
    write_report,
};
use log::{LevelFilter, debug, warn};
use std::process::exit;

/// Entry point for the disk-usage-report application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code. Invocation
/// errors never get here: clap prints usage and exits on its own.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// Resolves the options, the banner tool and the palette once, then runs the
/// scan and writes the report.
///
/// # Errors
///
/// Returns errors for a missing banner tool, an unreadable target directory,
/// or output that cannot be written.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let file_config = load_config();
    let options = args.report_options(&file_config)?;

    init_logging(options.scan.verbose);

    if options.thresholds.is_inverted() {
        warn!(
            "critical threshold ({} MB) is below warn threshold ({} MB); nothing will be reported as WARN",
            options.thresholds.critical_mb, options.thresholds.warn_mb
        );
    }

    let banner = if options.banner {
        let figlet = FigletBanner::locate()?;
        debug!("rendering banner with {}", figlet.program().display());
        Some(figlet)
    } else {
        None
    };
    let palette = Palette::resolve(options.color, options.output.is_some());

    let written = write_report(
        &options,
        palette,
        banner.as_ref().map(|b| b as &dyn BannerRenderer),
        false,
    )?;

    if let Some(path) = written {
        println!("{} {}", "Report appended to".green(), path.display());
    }

    Ok(())
}

/// Route `log` output to stderr; `--verbose` enables debug detail.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# disk-usage-report configuration
# All values shown are their defaults. Uncomment and change as needed.

# Directory to report on (defaults to the current directory when not set)
# directory = "."

# Append reports to this file instead of printing them
# output = "~/disk-usage.txt"

[thresholds]
# Size in MB from which an entry is reported as WARN
# warn = 100

# Size in MB from which an entry is reported as CRIT
# critical = 500

[scanning]
# Size backend: "native" (built in) or "du" (host du utility)
# engine = "native"

# Measure apparent file sizes instead of allocated disk blocks
# apparent_size = false

# Report entries skipped because they could not be read
# verbose = false

[display]
# Colorize sizes: "auto", "always" or "never"
# color = "auto"

# Render the figlet banner above the report
# banner = true
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_str(val: Option<&str>, default: &str) -> String {
        val.map_or_else(
            || format!("\"{default}\"  (default)"),
            |v| format!("\"{v}\""),
        )
    }
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_mb(val: Option<u64>, default: u64) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_path(val: Option<&std::path::Path>, default: &str) -> String {
        val.map_or_else(
            || format!("{default}  (default)"),
            |p| format!("\"{}\"", p.display()),
        )
    }

    format!(
        "directory     = {directory}
output        = {output}

[thresholds]
warn          = {warn}
critical      = {critical}

[scanning]
engine        = {engine}
apparent_size = {apparent_size}
verbose       = {verbose}

[display]
color         = {color}
banner        = {banner}",
        directory = show_path(config.directory.as_deref(), "(current directory)"),
        output = show_path(config.output.as_deref(), "(stdout)"),
        warn = show_mb(config.thresholds.warn, DEFAULT_WARN_MB),
        critical = show_mb(config.thresholds.critical, DEFAULT_CRITICAL_MB),
        engine = show_str(config.scanning.engine.as_deref(), "native"),
        apparent_size = show_bool(config.scanning.apparent_size, false),
        verbose = show_bool(config.scanning.verbose, false),
        color = show_str(config.display.color.as_deref(), "auto"),
        banner = show_bool(config.display.banner, true),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the report defaults from the config file.
///
/// A broken config file never blocks a report: the problem is printed and the
/// built-in defaults are used instead.
fn load_config() -> FileConfig {
    FileConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Warning: ignoring config file:".yellow());
        FileConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_template_parses() {
        let config: FileConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert!(config.directory.is_none());
        assert!(config.thresholds.warn.is_none());
    }

    #[test]
    fn test_format_config_marks_defaults() {
        let text = format_config(&FileConfig::default());

        assert!(text.contains("warn          = 100  (default)"));
        assert!(text.contains("critical      = 500  (default)"));
        assert!(text.contains("engine        = \"native\"  (default)"));
        assert!(text.contains("banner        = true  (default)"));
    }

    #[test]
    fn test_format_config_shows_file_values() {
        let config: FileConfig =
            toml::from_str("output = \"/tmp/r.txt\"\n[thresholds]\nwarn = 7\n").unwrap();
        let text = format_config(&config);

        assert!(text.contains("output        = \"/tmp/r.txt\""));
        assert!(text.contains("warn          = 7\n"));
    }
}
