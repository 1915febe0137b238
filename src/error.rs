//! Error handling for the trimbench harness
//!
//! Provides the error type shared by configuration loading, plan
//! construction, and the benchmark driver.

use thiserror::Error;

/// Error type for all trimbench operations
#[derive(Error, Debug)]
pub enum TrimbenchError {
    /// I/O errors (config files, log directory creation)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (bad file, failed validation, bad override)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error for numeric or other structured data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Launching an external process failed outright
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Unknown benchmark suite requested on the command line
    #[error("Unknown suite '{0}'")]
    UnknownSuite(String),

    /// Generic anyhow error for complex nested errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrimbenchError {
    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a Spawn error for a given program name
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

/// Result type alias for trimbench operations
pub type Result<T> = std::result::Result<T, TrimbenchError>;
