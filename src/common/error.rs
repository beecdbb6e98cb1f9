//! Error handling module
//!
//! This module defines the crate-wide error type and result alias. Each
//! subsystem keeps its own narrower error enum and converts into this one.

use thiserror::Error;
use std::io;

use crate::config::ConfigError;
use crate::store::DecodeError;

/// Proxydock error type
#[derive(Error, Debug)]
pub enum ProxydockError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error, always fatal at startup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted record could not be decoded
    #[error("Record decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ProxydockError`.
pub type Result<T> = std::result::Result<T, ProxydockError>;
