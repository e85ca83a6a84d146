//! Diagnostic logging for the CLI.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Logs go to stderr so they never mix with raw PCM on stdout.

use std::fmt;
use std::io;

use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter};

/// Log level selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level for `-q` and a count of `-v` flags. The default is `warn`.
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Build the event filter: `RUST_LOG` wins unless a level was given
/// explicitly on the command line.
pub fn build_filter(level: LogLevel, explicit: bool) -> EnvFilter {
    if explicit {
        return EnvFilter::new(level.to_string());
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: LogLevel, explicit: bool) {
    let subscriber = tracing_subscriber::registry()
        .with(build_filter(level, explicit))
        .with(
            subscriber_fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        );

    // Ignore error if subscriber was already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}
