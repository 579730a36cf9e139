//! File-only logging setup for TUI mode.
//!
//! While ratatui owns the terminal in raw/alternate-screen mode,
//! nothing may print to stdout, so all logs go to a daily-rolling JSON
//! file under the app data directory. Standard `log` macro calls are
//! redirected to `tracing`.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration
/// of the application so buffered logs are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {e}");
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "finlex.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    // No stdout layer — the TUI owns the terminal
    tracing_subscriber::registry().with(file_layer).init();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {e}");
    }

    log::info!("Logging initialized. Writing to {:?}", log_dir.join("finlex.log"));

    guard
}

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("finlex").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
