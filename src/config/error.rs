//! Configuration errors
//!
//! This module defines error types for the configuration module. Every
//! variant except [`ConfigError::VersionRequested`] is fatal at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or unknown command line arguments
    #[error("Invalid command line arguments: {0}")]
    InvalidArgs(String),

    /// Invalid value for configuration option
    #[error("Invalid value for '{0}': {1}")]
    InvalidValue(String, String),

    /// The user home directory was needed but could not be determined
    #[error("Cannot determine the user home directory")]
    HomeDirUnavailable,

    /// A directory could not be created
    #[error("Failed to create directory {0}: {1}")]
    CreateDir(PathBuf, String),

    /// The log sink could not be initialized
    #[error("Failed to initialize logger: {0}")]
    LogSink(String),

    /// An environment variable could not be written
    #[error("Failed to set environment variable {0}: {1}")]
    SetEnv(String, String),

    /// `--help` was given; carries the rendered help text
    #[error("{0}")]
    HelpRequested(String),

    /// `--version` was given; the caller prints the version and exits
    #[error("Version requested")]
    VersionRequested,
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<clap::Error> for ConfigError {
    fn from(err: clap::Error) -> Self {
        ConfigError::InvalidArgs(err.to_string())
    }
}
