//! Logging configuration and initialization for gator.
//!
//! Standard output is reserved for command output, so log events go to
//! stderr and, optionally, to a log file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Resolve the effective level, `verbose` forcing at least debug.
fn effective_level(level: &str, verbose: bool) -> Level {
    let level = parse_level(level);
    if verbose && level < Level::DEBUG {
        Level::DEBUG
    } else {
        level
    }
}

/// Initialize the logging system with the given configuration.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = effective_level(&config.level, verbose);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let Some(file) = config.file.as_deref() else {
        init_console_only(level.as_str());
        return Ok(());
    };

    if let Some(parent) = Path::new(file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new().create(true).append(true).open(file)?;
    let writer = std::io::stderr.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .ok();

    Ok(())
}

/// Initialize stderr-only logging.
pub fn init_console_only(level: &str) {
    let level = parse_level(level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .ok();
}
