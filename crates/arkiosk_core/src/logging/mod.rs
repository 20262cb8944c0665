//! Logging infrastructure for the kiosk.
//!
//! All components log through `tracing` macros. This module only wires up
//! the global subscriber:
//! - stderr output with targets, filtered by `RUST_LOG` or a default level
//! - optional daily-rolling log files for unattended kiosk installs
//!
//! # Example
//!
//! ```no_run
//! use arkiosk_core::logging::{init_tracing_with_file, LogLevel};
//!
//! // Keep the guard alive for the life of the process so buffered
//! // file output is flushed on exit.
//! let _guard = init_tracing_with_file(LogLevel::Info, ".logs");
//! tracing::info!("kiosk starting");
//! ```

mod types;

pub use types::LogLevel;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for rolling log files.
const LOG_FILE_PREFIX: &str = "arkiosk.log";

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing with an additional daily-rolling file in `logs_dir`.
///
/// Returns the writer guard; dropping it flushes and stops the file writer.
/// If the log directory cannot be created, falls back to stderr-only
/// logging and returns `None`.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    logs_dir: impl AsRef<Path>,
) -> Option<WorkerGuard> {
    let logs_dir = logs_dir.as_ref();

    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        init_tracing(default_level);
        tracing::warn!(
            "Cannot create logs folder {}: {}; logging to stderr only",
            logs_dir.display(),
            e
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    Some(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter()))
}
