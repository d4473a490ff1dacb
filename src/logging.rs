//! Tracing setup.
//!
//! The terminal UI owns the screen, so it only logs when a log file is
//! given. Headless commands log warnings (or everything, with verbose)
//! to stderr so stdout stays clean for exported data.

use std::fs::File;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Nothing is logged.
    Off,
    /// Human-readable lines on stderr.
    Stderr,
}

/// Initialize tracing once for the process.
///
/// A log file, when given, wins over `sink`.
pub fn init_tracing(log_file: Option<&Path>, sink: LogSink, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    if let Some(path) = log_file {
        let Ok(file) = File::create(path) else {
            eprintln!("Warning: failed to create log file: {}", path.display());
            return;
        };
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(file_layer)
            .init();
        return;
    }

    if sink == LogSink::Stderr {
        let level = if verbose { "debug" } else { "warn" };
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time();
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(stderr_layer)
            .init();
    }
}
