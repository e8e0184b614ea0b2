//! Debug logging
//!
//! Highlighting emits `tracing` events unconditionally. A subscriber is only
//! installed when debug logging is on; it appends to
//! `<temp_dir>/lexstyle/debug.log` through a non-blocking writer.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE: &str = "debug.log";

/// Keeps the log writer alive; logs are flushed when dropped
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Directory holding the debug log
pub fn log_dir() -> PathBuf {
    std::env::temp_dir().join("lexstyle")
}

/// The debug log itself
pub fn log_file() -> PathBuf {
    log_dir().join(LOG_FILE)
}

/// Install the debug log subscriber if `config` asks for it
pub fn init(config: &Config) -> Option<LoggingGuard> {
    if !config.debug {
        return None;
    }

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexstyle=debug"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::debug!(log_file = %log_file().display(), "debug logging initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
