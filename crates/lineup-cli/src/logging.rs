//! Structured logging setup for the `lineup` binary.
//!
//! The filter comes from `--log-level`, then `LINEUP_TRACE`, and defaults to
//! `off`. `LINEUP_LOG_FORMAT` selects `pretty` (default) or `json` output on
//! stderr, and `LINEUP_LOG_FILE` adds a second sink appending to a file.

use std::env;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_ENV: &str = "LINEUP_TRACE";
pub const FORMAT_ENV: &str = "LINEUP_LOG_FORMAT";
pub const FILE_ENV: &str = "LINEUP_LOG_FILE";

/// Errors raised while installing the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    LogFile { path: String, message: String },
    Init(String),
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOG_INVALID_FORMAT",
            LoggingError::LogFile { .. } => "LOG_FILE",
            LoggingError::Init(_) => "LOG_INIT",
        }
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::InvalidFilter(msg) => {
                write!(f, "[{}] Invalid log filter: {}", self.code(), msg)
            }
            LoggingError::InvalidFormat(value) => write!(
                f,
                "[{}] Invalid {FORMAT_ENV} '{}' (expected 'json' or 'pretty')",
                self.code(),
                value
            ),
            LoggingError::LogFile { path, message } => write!(
                f,
                "[{}] Failed to open log file {}: {}",
                self.code(),
                path,
                message
            ),
            LoggingError::Init(msg) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Output encoding of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::InvalidFormat(value.to_string()))
        }
    }
}

/// Build the event filter; `off` (any case) disables logging.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
    }
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile {
            path: path.to_string(),
            message: err.to_string(),
        })
}

fn map_init_err<E: fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already set.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;

    let format = match env::var(FORMAT_ENV) {
        Ok(value) => LogFormat::parse(&value)?,
        Err(_) => LogFormat::Pretty,
    };
    let log_file = env::var(FILE_ENV).ok().map(|path| open_log_file(&path)).transpose()?;

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!(LogFormat::parse("JSON"), Ok(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Ok(LogFormat::Pretty));
        let err = LogFormat::parse("xml").unwrap_err();
        assert_eq!(err.code(), "LOG_INVALID_FORMAT");
        assert!(err.to_string().contains("'xml'"));
    }

    #[test]
    fn filters_accept_levels_and_directives() {
        assert!(build_filter("off").is_ok());
        assert!(build_filter("OFF").is_ok());
        assert!(build_filter("debug").is_ok());
        assert!(build_filter("lineup_assign=trace,lineup_highs=debug").is_ok());
        assert!(matches!(
            build_filter("lineup=notalevel"),
            Err(LoggingError::InvalidFilter(_))
        ));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let err = open_log_file("/nonexistent/dir/lineup.log").unwrap_err();
        assert_eq!(err.code(), "LOG_FILE");
        assert!(err.to_string().contains("/nonexistent/dir/lineup.log"));
    }
}
