use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Name of the log file written under the log directory.
pub const LOG_FILE_NAME: &str = "mazeplay.log";

/// Sends `tracing` output to `<log_dir>/mazeplay.log`.
///
/// The terminal belongs to the maze display, so nothing is logged to stdout or stderr.
/// The level comes from `RUST_LOG` and defaults to `info`. Keep the returned guard alive
/// until exit so buffered lines get flushed.
pub fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .init();
    guard
}
