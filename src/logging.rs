//! Logging setup for hosts embedding the evaluation core.
//!
//! The crate itself only emits `tracing` events (audit completion counts,
//! soft-failure skips). Front-ends that want them on disk call
//! [`init_logging`] once at startup with the directory and file name of
//! their choice; [`file_writer`] is the reusable building block for hosts
//! that compose their own subscriber.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Non-blocking writer appending to `file_name` under `log_dir`.
///
/// The returned guard must be kept alive for the duration of the program;
/// dropping it flushes buffered log lines to disk.
pub fn file_writer(log_dir: &Path, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    tracing_appender::non_blocking(file_appender)
}

/// Install the global subscriber writing to `file_name` under `log_dir`.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Call once per
/// process; audit runs themselves work fine without any subscriber.
pub fn init_logging(log_dir: &Path, file_name: &str) -> WorkerGuard {
    let (non_blocking, guard) = file_writer(log_dir, file_name);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
        )
        .init();

    guard
}
