//! Structured logging for the harness
//!
//! Benchmark output from the external tools goes to the per-run log files
//! via shell redirection; this module only configures the harness's own
//! diagnostics through `tracing`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use crate::error::{Result, TrimbenchError};

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = TrimbenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(TrimbenchError::config(format!(
                "Invalid log level: {}",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level; `RUST_LOG` takes precedence when set
    pub level: LogLevel,
    /// Emit JSON-formatted events instead of human-readable lines
    pub json_format: bool,
}

/// Install the global tracing subscriber.
///
/// Safe to call once per process; later calls fail if a subscriber is
/// already installed, which is ignored so tests can set up logging freely.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.level).into())
        .from_env_lossy();

    let result = if config.json_format {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };
    // A second init (e.g. in tests) keeps the existing subscriber.
    let _ = result;
}
