//! Common module
//!
//! This module contains shared types, errors, and utility functions used throughout the application.

pub mod error;
pub mod fs;
pub mod log;

// Re-export commonly used types and functions
pub use error::{ProxydockError, Result};
pub use log::{init_logger, LogSettings, LogWay};
pub use fs::{ensure_dir, expand_home, normalize_config_dir};
