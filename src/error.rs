//! Error handling for logseek
//!
//! This module provides the error type and result alias shared by every
//! logseek operation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or streaming log lines
#[derive(Error, Debug)]
pub enum Error {
    /// The log directory could not be enumerated
    #[error("could not read directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A log file could not be opened
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O failure while seeking, reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A probed line does not match the Apache Common Log Format
    #[error("line {line:?}: invalid log format")]
    InvalidLogFormat { line: String },

    /// A probed line matched the log shape but its datetime field is invalid
    #[error("line {line:?}: {source}")]
    InvalidTimestamp {
        line: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Errors related to configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for logseek operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new directory enumeration error
    pub fn directory(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    /// Create a new file open error
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid-log-format error
    pub fn invalid_log_format(line: impl Into<String>) -> Self {
        Self::InvalidLogFormat { line: line.into() }
    }

    /// Create a new invalid-timestamp error
    pub fn invalid_timestamp(line: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidTimestamp {
            line: line.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an I/O error (including open and directory failures)
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Open { .. } | Self::Directory { .. })
    }

    /// Check if this error came from a malformed log line
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidLogFormat { .. } | Self::InvalidTimestamp { .. })
    }
}
