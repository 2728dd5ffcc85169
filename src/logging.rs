use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging to stderr and, when `log_dir` is given, to a daily JSON log file.
///
/// Stdout stays reserved for the run summary and the JSON payload. Keep the
/// returned guard alive until exit; dropping it flushes buffered file lines.
#[must_use = "dropping the guard stops the file writer"]
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise default to info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("campus_events=info,warn"));

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Could not create log directory {}: {}", dir.display(), e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(dir, "campus_events.log");
        let (non_blocking_writer, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);
        Some(fmt::layer().json().with_writer(non_blocking_writer))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
