//! Tracing setup for the `flashcards` binary
//!
//! Stdout belongs to the review session, so diagnostics go to stderr in a
//! compact form without timestamps. When `Config::log_dir` is set, a daily
//! rolling file also records every event with timestamps and the enclosing
//! `deck` span.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub const LOG_FILE_PREFIX: &str = "flashcards.log";

/// Flushes the file log on drop; hold it until the process exits
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Filter from `RUST_LOG` syntax, falling back to `warn` on a bad directive
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact();

    let file = config.log_dir.as_deref().and_then(rolling_writer);
    let (file_layer, guard) = match file {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn rolling_writer(dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    // The subscriber is not installed yet, so this can only go to stderr
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("file logging disabled: cannot create {}: {err}", dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
