//! Logging initialization.
//!
//! TUI mode: logs to `<log_dir>/fieldguide-{datetime}.log` (stderr is the
//! terminal UI, so file logging is the only usable sink).
//! Otherwise: logs to stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Result of logging initialization.
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set when file logging is active).
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// `log_dir: Some(dir)` writes to a timestamped file under `dir` (created if
/// missing); `None` logs to stderr. `debug_override` forces the `debug`
/// level; `RUST_LOG` wins over both.
pub fn init_logging(log_dir: Option<&Path>, debug_override: bool) -> Result<LoggingHandle> {
    let log_level = if debug_override { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
    );

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let log_filename = format!("fieldguide-{timestamp}.log");
        let log_file_path = dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
