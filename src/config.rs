//! Configuration for the log reader
//!
//! This module provides the configuration options consumed by
//! [`LogReader`](crate::reader::LogReader).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Configuration options for a log reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Directory holding the rotated log files
    pub directory: PathBuf,
    /// Window length in minutes, measured back from "now"
    pub last_n_minutes: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            last_n_minutes: 1,
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory holding the rotated log files
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the window length in minutes
    pub fn with_last_n_minutes(mut self, minutes: u32) -> Self {
        self.last_n_minutes = minutes;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.last_n_minutes == 0 {
            return Err(Error::config("window must be at least one minute"));
        }
        if self.directory.as_os_str().is_empty() {
            return Err(Error::config("log directory must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ReaderConfig::default();
        assert_eq!(cfg.directory, PathBuf::from("."));
        assert_eq!(cfg.last_n_minutes, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let cfg = ReaderConfig::new()
            .with_directory("/var/log/http")
            .with_last_n_minutes(15);

        assert_eq!(cfg.directory, PathBuf::from("/var/log/http"));
        assert_eq!(cfg.last_n_minutes, 15);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let cfg = ReaderConfig::new().with_last_n_minutes(0);
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let cfg = ReaderConfig::new().with_directory("");
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }
}
