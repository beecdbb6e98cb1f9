//! Configuration builder
//!
//! This module provides a builder pattern for resolving parameters from
//! ranked sources.

use std::ffi::OsString;
use std::path::PathBuf;

use log::debug;

use crate::common::normalize_config_dir;
use crate::config::defaults::{self, LOG_LEVELS};
use crate::config::error::{ConfigError, Result};
use crate::config::source::{ArgPolicy, CliSource, ConfigSource, DefaultSource, EnvSource};
use crate::config::types::{Params, ValueSource};

/// Parameter builder
///
/// Sources are applied in the order they are added, lowest priority first.
pub struct ParamsBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    home: Option<PathBuf>,
}

impl ParamsBuilder {
    /// Create a new builder with no sources
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            home: dirs::home_dir(),
        }
    }

    /// Add default source
    pub fn with_defaults(mut self) -> Self {
        debug!("Adding default parameter source");
        self.sources.push(Box::new(DefaultSource));
        self
    }

    /// Add environment source
    pub fn with_env(mut self, prefix: &str) -> Self {
        debug!("Adding environment parameter source with prefix: {}", prefix);
        self.sources.push(Box::new(EnvSource::new(prefix)));
        self
    }

    /// Add command line source; `args` includes the program name
    pub fn with_cli<I, T>(mut self, args: I, policy: ArgPolicy) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        debug!("Adding command line parameter source");
        self.sources.push(Box::new(CliSource::new(args, policy)));
        self
    }

    /// Add an arbitrary source
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Use `home` for `~` and `$HOME` expansion instead of the detected home directory
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Resolve the parameters
    ///
    /// Has no side effects on the filesystem or the process environment.
    pub fn build(self) -> Result<Params> {
        let mut params = Params::default();

        debug!("Building parameters from {} sources", self.sources.len());

        for source in &self.sources {
            let source_type = source.source_type();
            debug!("Loading parameters from source: {:?}", source_type);

            let loaded = source.load()?;
            params = params.merge(&loaded, source_type);
        }

        params.set_default_values();

        if params.show_version() {
            return Err(ConfigError::VersionRequested);
        }

        if params.lite() {
            params.values.pass_check_root = Some(true);
            let lite_source = params.source("lite").unwrap_or(ValueSource::Default);
            params.sources.insert("pass-check-root".to_string(), lite_source);
        }

        let raw_config = match &params.values.config {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                params.sources.insert("config".to_string(), ValueSource::Default);
                defaults::config_dir(params.lite()).to_string()
            }
        };
        params.values.config = Some(normalize_config_dir(&raw_config, self.home.as_deref())?);

        validate(&params)?;

        Ok(params)
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new().with_defaults().with_env(defaults::ENV_PREFIX)
    }
}

fn validate(params: &Params) -> Result<()> {
    let level = params.log_level().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::InvalidValue(
            "log-level".to_string(),
            format!("{}. Valid values are: {}", params.log_level(), LOG_LEVELS.join(", ")),
        ));
    }

    if params.log_max_days() < 0 {
        return Err(ConfigError::InvalidValue(
            "log-max-days".to_string(),
            format!("{} must not be negative", params.log_max_days()),
        ));
    }

    let cert_key = params.grpc_inbound_cert_key();
    if !cert_key.is_empty() && cert_key.len() != 2 {
        return Err(ConfigError::InvalidValue(
            "grpc-inbound-cert-key".to_string(),
            "expected exactly two paths: certificate,key".to_string(),
        ));
    }

    Ok(())
}
