//! Configuration types
//!
//! This module contains the resolved parameter snapshot and its supporting types.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::LogSettings;
use crate::config::defaults;
use crate::config::error::ConfigError;

/// IPv6 support mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ipv6Support {
    /// Detect at runtime
    #[default]
    Auto,
    /// Always enabled
    On,
    /// Always disabled
    Off,
}

impl fmt::Display for Ipv6Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ipv6Support::Auto => write!(f, "auto"),
            Ipv6Support::On => write!(f, "on"),
            Ipv6Support::Off => write!(f, "off"),
        }
    }
}

impl FromStr for Ipv6Support {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ConfigError::InvalidValue(
                "ipv6-support".to_string(),
                format!("{}. Valid values are: auto, on, off", s),
            )),
        }
    }
}

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Compiled default value
    Default,
    /// From environment variable
    Environment,
    /// From command line argument
    CommandLine,
    /// Replaced through the test override
    Override,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::Environment => write!(f, "environment"),
            ValueSource::CommandLine => write!(f, "command line"),
            ValueSource::Override => write!(f, "override"),
        }
    }
}

/// Parse a boolean flag value the way the environment and the command line spell it
pub fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("expected a boolean, got '{}'", s)),
    }
}

/// Parameter values
///
/// Every field is optional so that each source only carries what it actually
/// sets. The resolved snapshot has defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParamValues {
    /// Listening address of the web/API server
    #[serde(default)]
    pub address: Option<String>,

    /// Configuration directory
    #[serde(default)]
    pub config: Option<PathBuf>,

    /// Proxy core executable; auto-detected downstream when unset
    #[serde(default)]
    pub core_bin: Option<PathBuf>,

    /// Extra core config directory merged with the generated config
    #[serde(default)]
    pub core_confdir: Option<PathBuf>,

    /// Asset directory (geoip.dat and friends) exported to the core
    #[serde(default)]
    pub core_assetsdir: Option<PathBuf>,

    /// Executable run around transparent proxy start/stop
    #[serde(default)]
    pub transparent_hook: Option<PathBuf>,

    /// Web UI files; embedded files are used when unset
    #[serde(default)]
    pub webdir: Option<PathBuf>,

    /// Certificate and key for the gRPC inbound, `cert,key`
    #[serde(default)]
    pub grpc_inbound_cert_key: Option<Vec<String>>,

    #[serde(default)]
    pub ipv6_support: Option<Ipv6Support>,

    /// Skip privilege checking
    #[serde(default)]
    pub pass_check_root: Option<bool>,

    #[serde(default)]
    pub reset_password: Option<bool>,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub log_max_days: Option<i64>,

    #[serde(default)]
    pub log_disable_color: Option<bool>,

    /// Ignored in file mode
    #[serde(default)]
    pub log_disable_timestamp: Option<bool>,

    /// Lite mode for non-root users
    #[serde(default)]
    pub lite: Option<bool>,

    #[serde(default)]
    pub show_version: Option<bool>,

    #[serde(default)]
    pub report: Option<String>,
}

/// Resolved process parameters
///
/// Immutable once resolved; see [`crate::config::manager`] for how the
/// snapshot is shared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    /// Parameter values
    pub values: ParamValues,

    /// Source tracking, keyed by flag id
    pub sources: BTreeMap<String, ValueSource>,
}

impl Deref for Params {
    type Target = ParamValues;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl Serialize for Params {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = ParamValues::deserialize(deserializer)?;
        Ok(Self {
            values,
            sources: BTreeMap::new(),
        })
    }
}

impl Params {
    /// Create parameters from explicit values, e.g. for [`crate::config::override_params`]
    pub fn from_values(values: ParamValues, source: ValueSource) -> Self {
        let mut params = Self { values, sources: BTreeMap::new() };
        for name in params.set_fields() {
            params.sources.insert(name.to_string(), source);
        }
        params
    }

    /// Flag ids of all fields that currently hold a value
    pub fn set_fields(&self) -> Vec<&'static str> {
        let v = &self.values;
        let fields: [(&'static str, bool); 19] = [
            ("address", v.address.is_some()),
            ("config", v.config.is_some()),
            ("core-bin", v.core_bin.is_some()),
            ("core-confdir", v.core_confdir.is_some()),
            ("core-assetsdir", v.core_assetsdir.is_some()),
            ("transparent-hook", v.transparent_hook.is_some()),
            ("webdir", v.webdir.is_some()),
            ("grpc-inbound-cert-key", v.grpc_inbound_cert_key.is_some()),
            ("ipv6-support", v.ipv6_support.is_some()),
            ("pass-check-root", v.pass_check_root.is_some()),
            ("reset-password", v.reset_password.is_some()),
            ("log-level", v.log_level.is_some()),
            ("log-file", v.log_file.is_some()),
            ("log-max-days", v.log_max_days.is_some()),
            ("log-disable-color", v.log_disable_color.is_some()),
            ("log-disable-timestamp", v.log_disable_timestamp.is_some()),
            ("lite", v.lite.is_some()),
            ("version", v.show_version.is_some()),
            ("report", v.report.is_some()),
        ];
        fields.into_iter().filter(|(_, set)| *set).map(|(name, _)| name).collect()
    }

    /// Merge another set of parameters into this one
    ///
    /// Fields set in `other` win and are recorded with `source`.
    pub fn merge(&self, other: &Params, source: ValueSource) -> Self {
        let mut result = self.clone();

        macro_rules! merge_field {
            ($field:expr, $name:ident) => {
                if other.values.$name.is_some() {
                    result.values.$name = other.values.$name.clone();
                    result.sources.insert($field.to_string(), source);
                }
            };
        }

        merge_field!("address", address);
        merge_field!("config", config);
        merge_field!("core-bin", core_bin);
        merge_field!("core-confdir", core_confdir);
        merge_field!("core-assetsdir", core_assetsdir);
        merge_field!("transparent-hook", transparent_hook);
        merge_field!("webdir", webdir);
        merge_field!("grpc-inbound-cert-key", grpc_inbound_cert_key);
        merge_field!("ipv6-support", ipv6_support);
        merge_field!("pass-check-root", pass_check_root);
        merge_field!("reset-password", reset_password);
        merge_field!("log-level", log_level);
        merge_field!("log-file", log_file);
        merge_field!("log-max-days", log_max_days);
        merge_field!("log-disable-color", log_disable_color);
        merge_field!("log-disable-timestamp", log_disable_timestamp);
        merge_field!("lite", lite);
        merge_field!("version", show_version);
        merge_field!("report", report);

        result
    }

    /// Set default values for all options that have one
    ///
    /// The config directory is not filled here since its default depends
    /// on lite mode; see [`crate::config::ParamsBuilder::build`].
    pub fn set_default_values(&mut self) {
        macro_rules! default_field {
            ($field:expr, $name:ident, $value:expr) => {
                if self.values.$name.is_none() {
                    self.values.$name = Some($value);
                    self.sources.insert($field.to_string(), ValueSource::Default);
                }
            };
        }

        default_field!("address", address, defaults::address());
        default_field!("ipv6-support", ipv6_support, defaults::ipv6_support());
        default_field!("pass-check-root", pass_check_root, false);
        default_field!("reset-password", reset_password, false);
        default_field!("log-level", log_level, defaults::log_level());
        default_field!("log-max-days", log_max_days, defaults::log_max_days());
        default_field!("log-disable-color", log_disable_color, false);
        default_field!("log-disable-timestamp", log_disable_timestamp, false);
        default_field!("lite", lite, false);
        default_field!("version", show_version, false);
    }

    /// Get the source of a configuration value
    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.sources.get(name).copied()
    }

    /// Get the listening address
    pub fn address(&self) -> &str {
        self.values.address.as_deref().unwrap_or(defaults::ADDRESS_STR)
    }

    /// Get the configuration directory
    pub fn config_dir(&self) -> &Path {
        self.values
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(defaults::config_dir(self.lite())))
    }

    pub fn core_bin(&self) -> Option<&Path> {
        self.values.core_bin.as_deref()
    }

    pub fn core_confdir(&self) -> Option<&Path> {
        self.values.core_confdir.as_deref()
    }

    pub fn core_assetsdir(&self) -> Option<&Path> {
        self.values.core_assetsdir.as_deref()
    }

    pub fn transparent_hook(&self) -> Option<&Path> {
        self.values.transparent_hook.as_deref()
    }

    pub fn webdir(&self) -> Option<&Path> {
        self.values.webdir.as_deref()
    }

    /// Get the gRPC inbound certificate and key paths
    pub fn grpc_inbound_cert_key(&self) -> &[String] {
        self.values.grpc_inbound_cert_key.as_deref().unwrap_or(&[])
    }

    pub fn ipv6_support(&self) -> Ipv6Support {
        self.values.ipv6_support.unwrap_or_default()
    }

    pub fn pass_check_root(&self) -> bool {
        self.values.pass_check_root.unwrap_or(false)
    }

    pub fn reset_password(&self) -> bool {
        self.values.reset_password.unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.values.log_level.as_deref().unwrap_or(defaults::LOG_LEVEL_STR)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.values.log_file.as_deref()
    }

    pub fn log_max_days(&self) -> i64 {
        self.values.log_max_days.unwrap_or_else(defaults::log_max_days)
    }

    pub fn log_disable_color(&self) -> bool {
        self.values.log_disable_color.unwrap_or(false)
    }

    pub fn log_disable_timestamp(&self) -> bool {
        self.values.log_disable_timestamp.unwrap_or(false)
    }

    pub fn lite(&self) -> bool {
        self.values.lite.unwrap_or(false)
    }

    pub fn show_version(&self) -> bool {
        self.values.show_version.unwrap_or(false)
    }

    /// Get the requested report, if any
    pub fn report(&self) -> Option<&str> {
        self.values.report.as_deref()
    }

    /// Logging settings derived from these parameters
    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(
            self.values.log_file.clone(),
            self.log_level(),
            self.log_max_days(),
            self.log_disable_color(),
            self.log_disable_timestamp(),
        )
    }

    /// Log the parameters with source information
    pub fn log(&self) {
        let src = |name: &str| {
            self.source(name)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unset".to_string())
        };

        debug!("=== Parameters ===");
        debug!("  address: {} (from {})", self.address(), src("address"));
        debug!("  config: {} (from {})", self.config_dir().display(), src("config"));
        if let Some(path) = self.core_bin() {
            debug!("  core-bin: {} (from {})", path.display(), src("core-bin"));
        }
        if let Some(path) = self.core_confdir() {
            debug!("  core-confdir: {} (from {})", path.display(), src("core-confdir"));
        }
        if let Some(path) = self.core_assetsdir() {
            debug!("  core-assetsdir: {} (from {})", path.display(), src("core-assetsdir"));
        }
        if let Some(path) = self.transparent_hook() {
            debug!("  transparent-hook: {} (from {})", path.display(), src("transparent-hook"));
        }
        if let Some(path) = self.webdir() {
            debug!("  webdir: {} (from {})", path.display(), src("webdir"));
        }
        if !self.grpc_inbound_cert_key().is_empty() {
            debug!(
                "  grpc-inbound-cert-key: {} (from {})",
                self.grpc_inbound_cert_key().join(","),
                src("grpc-inbound-cert-key")
            );
        }
        debug!("  ipv6-support: {} (from {})", self.ipv6_support(), src("ipv6-support"));
        debug!("  pass-check-root: {} (from {})", self.pass_check_root(), src("pass-check-root"));
        debug!("  lite: {} (from {})", self.lite(), src("lite"));
        debug!("  log-level: {} (from {})", self.log_level(), src("log-level"));
        if let Some(path) = self.log_file() {
            debug!("  log-file: {} (from {})", path.display(), src("log-file"));
        }
        debug!("  log-max-days: {} (from {})", self.log_max_days(), src("log-max-days"));
        debug!("==================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv6_support_parse() {
        assert_eq!("AUTO".parse::<Ipv6Support>().unwrap(), Ipv6Support::Auto);
        assert_eq!("on".parse::<Ipv6Support>().unwrap(), Ipv6Support::On);
        assert_eq!("off".parse::<Ipv6Support>().unwrap(), Ipv6Support::Off);
        assert!("sometimes".parse::<Ipv6Support>().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert!(parse_bool("perhaps").is_err());
    }

    #[test]
    fn test_merge_tracks_sources() {
        let mut low = Params::default();
        low.values.log_level = Some("warn".to_string());
        low.values.address = Some("127.0.0.1:1".to_string());
        let low = Params::default().merge(&low, ValueSource::Environment);

        let mut high = Params::default();
        high.values.log_level = Some("trace".to_string());

        let merged = low.merge(&high, ValueSource::CommandLine);
        assert_eq!(merged.log_level(), "trace");
        assert_eq!(merged.source("log-level"), Some(ValueSource::CommandLine));
        assert_eq!(merged.address(), "127.0.0.1:1");
        assert_eq!(merged.source("address"), Some(ValueSource::Environment));
    }

    #[test]
    fn test_set_default_values_keeps_existing() {
        let mut params = Params::default();
        params.values.log_max_days = Some(10);
        params.sources.insert("log-max-days".to_string(), ValueSource::CommandLine);
        params.set_default_values();

        assert_eq!(params.log_max_days(), 10);
        assert_eq!(params.source("log-max-days"), Some(ValueSource::CommandLine));
        assert_eq!(params.address(), defaults::ADDRESS_STR);
        assert_eq!(params.source("address"), Some(ValueSource::Default));
        assert!(params.values.config.is_none());
    }

    #[test]
    fn test_from_values_records_source() {
        let values = ParamValues {
            lite: Some(true),
            ..ParamValues::default()
        };
        let params = Params::from_values(values, ValueSource::Override);
        assert_eq!(params.source("lite"), Some(ValueSource::Override));
        assert_eq!(params.source("address"), None);
    }
}
