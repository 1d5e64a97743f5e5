//! Structured logging setup.
//!
//! The interactive UI owns the terminal, so it logs to a file only. One-shot
//! commands log to the file and to stderr.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an `EnvFilter` directive, e.g. `trello_radar=debug`
pub const LOG_ENV: &str = "TRELLO_RADAR_LOG";
const LOG_FILE_NAME: &str = "trello-radar.log";

/// Controls where logs are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingDestination {
    /// Log file plus warnings and errors on stderr (one-shot commands)
    FileAndStderr,
    /// Log file only (the TUI draws on the terminal)
    FileOnly,
}

#[derive(Debug)]
struct LoggingGuards {
    _guard: WorkerGuard,
    log_path: PathBuf,
}

static LOGGING_STATE: OnceLock<LoggingGuards> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] io::Error),
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber writing into `log_dir`.
///
/// The first call wins; later calls return the already chosen log file.
pub fn init_logging(
    log_dir: &Path,
    destination: LoggingDestination,
) -> Result<&'static PathBuf, LoggingError> {
    if LOGGING_STATE.get().is_none() {
        let guards = install_logging(log_dir, destination)?;
        if let Err(guards) = LOGGING_STATE.set(guards) {
            drop(guards);
        }
    }

    match LOGGING_STATE.get() {
        Some(guards) => Ok(&guards.log_path),
        None => Err(LoggingError::Io(io::Error::other("logging state unavailable"))),
    }
}

pub fn current_log_path() -> Option<&'static PathBuf> {
    LOGGING_STATE.get().map(|guards| &guards.log_path)
}

fn install_logging(
    log_dir: &Path,
    destination: LoggingDestination,
) -> Result<LoggingGuards, LoggingError> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(
            tracing_subscriber::fmt::format()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .with_level(true)
                .with_target(true),
        )
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(build_filter()?);

    let stderr_layer = match destination {
        LoggingDestination::FileAndStderr => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .with_filter(EnvFilter::try_new("warn")?),
        ),
        LoggingDestination::FileOnly => None,
    };

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).try_init()?;

    info!(path = %log_path.display(), "Logging enabled");
    Ok(LoggingGuards { _guard: guard, log_path })
}

fn build_filter() -> Result<EnvFilter, ParseError> {
    if let Ok(directive) = env::var(LOG_ENV)
        && !directive.trim().is_empty()
    {
        return EnvFilter::try_new(directive);
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new("info"),
    }
}
