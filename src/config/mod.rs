//! Configuration module
//!
//! This module resolves the process parameters from command line flags,
//! `PROXYDOCK_*` environment variables and compiled defaults (in that order
//! of priority), normalizes the configuration directory and runs the startup
//! side effects exactly once per process.

pub mod bootstrap;
pub mod builder;
pub mod defaults;
pub mod error;
pub mod manager;
pub mod source;
pub mod types;

pub use self::bootstrap::{bootstrap, export_assets_dir};
pub use self::builder::ParamsBuilder;
pub use self::defaults::{ENV_PREFIX, ASSET_ENV_VARS};
pub use self::error::{ConfigError, Result};
pub use self::manager::{current, initialize, initialize_with, override_params, params};
pub use self::source::{ArgPolicy, CliArgs, CliSource, ConfigSource, DefaultSource, EnvSource};
pub use self::types::{Ipv6Support, ParamValues, Params, ValueSource};
