//! Configuration sources
//!
//! This module defines traits and implementations for loading parameters
//! from different sources.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};
use log::{debug, warn};

use crate::config::defaults::env_name;
use crate::config::error::{ConfigError, Result};
use crate::config::types::{parse_bool, Ipv6Support, ParamValues, Params, ValueSource};

/// Configuration source trait
pub trait ConfigSource {
    /// Load parameters from this source
    fn load(&self) -> Result<Params>;

    /// Get the source type
    fn source_type(&self) -> ValueSource;
}

/// How unknown command line arguments are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgPolicy {
    /// Unknown arguments are a fatal error
    #[default]
    Strict,
    /// Unknown arguments are dropped with a warning; meant for test harnesses
    /// that pass their own flags to the process
    TolerateUnknown,
}

/// Default configuration source
pub struct DefaultSource;

impl ConfigSource for DefaultSource {
    fn load(&self) -> Result<Params> {
        debug!("Loading default parameters");
        let mut params = Params::default();
        params.set_default_values();
        Ok(params)
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Default
    }
}

/// Environment variable configuration source
pub struct EnvSource {
    pub prefix: String,
}

impl EnvSource {
    /// Create a new environment source
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Read a variable, treating empty values as unset
    fn var(&self, flag_id: &str) -> Option<(String, String)> {
        let name = env_name(&self.prefix, flag_id);
        match env::var(&name) {
            Ok(value) if !value.is_empty() => Some((name, value)),
            _ => None,
        }
    }
}

const FLAG_IDS: [&str; 19] = [
    "address",
    "config",
    "core-bin",
    "core-confdir",
    "core-assetsdir",
    "transparent-hook",
    "webdir",
    "grpc-inbound-cert-key",
    "ipv6-support",
    "pass-check-root",
    "reset-password",
    "log-level",
    "log-file",
    "log-max-days",
    "log-disable-color",
    "log-disable-timestamp",
    "lite",
    "version",
    "report",
];

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<Params> {
        debug!("Loading parameters from environment variables with prefix: {}", self.prefix);

        let mut v = ParamValues::default();

        for flag_id in FLAG_IDS {
            let Some((name, value)) = self.var(flag_id) else {
                continue;
            };
            debug!("Found environment variable {}={}", name, value);

            let as_bool = |value: &str| {
                parse_bool(value).map_err(|e| ConfigError::InvalidValue(name.clone(), e))
            };

            match flag_id {
                "address" => v.address = Some(value),
                "config" => v.config = Some(PathBuf::from(value)),
                "core-bin" => v.core_bin = Some(PathBuf::from(value)),
                "core-confdir" => v.core_confdir = Some(PathBuf::from(value)),
                "core-assetsdir" => v.core_assetsdir = Some(PathBuf::from(value)),
                "transparent-hook" => v.transparent_hook = Some(PathBuf::from(value)),
                "webdir" => v.webdir = Some(PathBuf::from(value)),
                "grpc-inbound-cert-key" => {
                    v.grpc_inbound_cert_key = Some(split_list(&value));
                }
                "ipv6-support" => v.ipv6_support = Some(value.parse::<Ipv6Support>()?),
                "pass-check-root" => v.pass_check_root = Some(as_bool(&value)?),
                "reset-password" => v.reset_password = Some(as_bool(&value)?),
                "log-level" => v.log_level = Some(value),
                "log-file" => v.log_file = Some(PathBuf::from(value)),
                "log-max-days" => {
                    let days = value
                        .parse::<i64>()
                        .map_err(|e| ConfigError::InvalidValue(name.clone(), e.to_string()))?;
                    v.log_max_days = Some(days);
                }
                "log-disable-color" => v.log_disable_color = Some(as_bool(&value)?),
                "log-disable-timestamp" => v.log_disable_timestamp = Some(as_bool(&value)?),
                "lite" => v.lite = Some(as_bool(&value)?),
                "version" => v.show_version = Some(as_bool(&value)?),
                "report" => v.report = Some(value),
                _ => {}
            }
        }

        Ok(Params::from_values(v, self.source_type()))
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Environment
    }
}

/// Split a comma separated list, dropping empty items
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "proxydock",
    about = "Proxy manager bootstrap: resolves parameters and manages subscription records",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Listening address
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Configuration directory
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Proxy core executable. Auto-detected when empty
    #[arg(long)]
    pub core_bin: Option<String>,

    /// Additional core config directory, combined with the generated config
    #[arg(long)]
    pub core_confdir: Option<String>,

    /// Core asset directory; overrides V2RAY_LOCATION_ASSET and XRAY_LOCATION_ASSET
    #[arg(long)]
    pub core_assetsdir: Option<String>,

    /// Executable run before/after the transparent proxy starts and stops
    #[arg(long)]
    pub transparent_hook: Option<String>,

    /// Web files directory. Embedded files are used when empty
    #[arg(long)]
    pub webdir: Option<String>,

    /// Certificate and key for the gRPC inbound, e.g. /etc/proxydock/grpc.crt,/etc/proxydock/grpc.key
    #[arg(long, value_delimiter = ',')]
    pub grpc_inbound_cert_key: Vec<String>,

    /// auto, on or off
    #[arg(long)]
    pub ipv6_support: Option<String>,

    /// Skip privilege checking
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub pass_check_root: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub reset_password: Option<bool>,

    /// trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<String>,

    /// Maximum number of days to keep log files
    #[arg(long)]
    pub log_max_days: Option<i64>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub log_disable_color: Option<bool>,

    /// Avoid duplicate timestamps under journald. Ignored with --log-file
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub log_disable_timestamp: Option<bool>,

    /// Lite mode for non-root users
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub lite: Option<bool>,

    /// Print version and exit
    #[arg(long = "version", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool)]
    pub show_version: Option<bool>,

    /// Print a report (config, protocols) and exit
    #[arg(long)]
    pub report: Option<String>,
}

/// Command line argument configuration source
pub struct CliSource {
    pub args: Vec<OsString>,
    pub policy: ArgPolicy,
}

impl CliSource {
    /// Create a new command line source; `args` includes the program name
    pub fn new<I, T>(args: I, policy: ArgPolicy) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            policy,
        }
    }

    fn parse(&self) -> Result<CliArgs> {
        match CliArgs::try_parse_from(&self.args) {
            Ok(args) => Ok(args),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                Err(ConfigError::HelpRequested(e.to_string()))
            }
            Err(e)
                if self.policy == ArgPolicy::TolerateUnknown
                    && e.kind() == ErrorKind::UnknownArgument =>
            {
                warn!("Ignoring unknown command line arguments: {}", e);
                let matches = CliArgs::command()
                    .ignore_errors(true)
                    .try_get_matches_from(&self.args)?;
                Ok(CliArgs::from_arg_matches(&matches)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Empty strings on the command line count as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl ConfigSource for CliSource {
    fn load(&self) -> Result<Params> {
        debug!("Loading parameters from command line arguments");

        let args = self.parse()?;

        let ipv6_support = non_empty(args.ipv6_support)
            .map(|s| s.parse::<Ipv6Support>())
            .transpose()?;
        let grpc_inbound_cert_key = if args.grpc_inbound_cert_key.is_empty() {
            None
        } else {
            Some(args.grpc_inbound_cert_key)
        };

        let values = ParamValues {
            address: non_empty(args.address),
            config: non_empty(args.config).map(PathBuf::from),
            core_bin: non_empty(args.core_bin).map(PathBuf::from),
            core_confdir: non_empty(args.core_confdir).map(PathBuf::from),
            core_assetsdir: non_empty(args.core_assetsdir).map(PathBuf::from),
            transparent_hook: non_empty(args.transparent_hook).map(PathBuf::from),
            webdir: non_empty(args.webdir).map(PathBuf::from),
            grpc_inbound_cert_key,
            ipv6_support,
            pass_check_root: args.pass_check_root,
            reset_password: args.reset_password,
            log_level: non_empty(args.log_level),
            log_file: non_empty(args.log_file).map(PathBuf::from),
            log_max_days: args.log_max_days,
            log_disable_color: args.log_disable_color,
            log_disable_timestamp: args.log_disable_timestamp,
            lite: args.lite,
            show_version: args.show_version,
            report: non_empty(args.report),
        };

        Ok(Params::from_values(values, self.source_type()))
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::CommandLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CliSource {
        let mut full = vec!["proxydock"];
        full.extend_from_slice(args);
        CliSource::new(full, ArgPolicy::Strict)
    }

    #[test]
    fn test_cli_values() {
        let params = cli(&[
            "-a", "127.0.0.1:3000",
            "--lite",
            "--log-max-days", "9",
            "--grpc-inbound-cert-key", "a.crt,a.key",
            "--ipv6-support", "off",
        ])
        .load()
        .unwrap();

        assert_eq!(params.values.address.as_deref(), Some("127.0.0.1:3000"));
        assert_eq!(params.values.lite, Some(true));
        assert_eq!(params.values.log_max_days, Some(9));
        assert_eq!(params.grpc_inbound_cert_key(), ["a.crt", "a.key"]);
        assert_eq!(params.values.ipv6_support, Some(Ipv6Support::Off));
        assert_eq!(params.source("lite"), Some(ValueSource::CommandLine));
        // Flags that were not given stay unset
        assert_eq!(params.values.log_level, None);
        assert_eq!(params.source("log-level"), None);
    }

    #[test]
    fn test_cli_explicit_false() {
        let params = cli(&["--lite=false"]).load().unwrap();
        assert_eq!(params.values.lite, Some(false));
    }

    #[test]
    fn test_cli_empty_is_unset() {
        let params = cli(&["--config", ""]).load().unwrap();
        assert_eq!(params.values.config, None);
    }

    #[test]
    fn test_cli_unknown_flag_is_fatal() {
        let result = cli(&["--no-such-flag"]).load();
        assert!(matches!(result, Err(ConfigError::InvalidArgs(_))));
    }

    #[test]
    fn test_cli_unknown_flag_tolerated() {
        let source = CliSource::new(
            ["proxydock", "--log-level", "debug", "--test-threads=1"],
            ArgPolicy::TolerateUnknown,
        );
        let params = source.load().unwrap();
        assert_eq!(params.values.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_bad_enum_is_fatal() {
        let result = cli(&["--ipv6-support", "sometimes"]).load();
        assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));
    }

    #[test]
    fn test_cli_help() {
        let result = cli(&["--help"]).load();
        assert!(matches!(result, Err(ConfigError::HelpRequested(_))));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
