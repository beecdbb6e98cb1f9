//! Default configuration values
//!
//! This module provides default values for configuration options.
//! It is designed to be a single source of truth for defaults,
//! making it easier to maintain consistent defaults across the application.

use super::types::Ipv6Support;

/// Environment variable prefix for all configuration options
pub const ENV_PREFIX: &str = "PROXYDOCK_";

/// Default listening address
pub const ADDRESS_STR: &str = "0.0.0.0:2017";

/// Default configuration directory when running as a system service
pub const SYSTEM_CONFIG_DIR: &str = "/etc/proxydock";

/// Default configuration directory in lite mode
pub const LITE_CONFIG_DIR: &str = "$HOME/.config/proxydock";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Environment variables read by the downstream proxy engines for their asset directory
pub const ASSET_ENV_VARS: [&str; 2] = ["V2RAY_LOCATION_ASSET", "XRAY_LOCATION_ASSET"];

/// Accepted log levels
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Default listening address
pub fn address() -> String {
    ADDRESS_STR.to_string()
}

/// Default configuration directory for the given mode
pub fn config_dir(lite: bool) -> &'static str {
    if lite {
        LITE_CONFIG_DIR
    } else {
        SYSTEM_CONFIG_DIR
    }
}

/// Default IPv6 support mode
pub fn ipv6_support() -> Ipv6Support {
    Ipv6Support::Auto
}

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default number of days to keep log files
pub fn log_max_days() -> i64 {
    3
}

/// Environment variable name for a flag id, e.g. `log-max-days` -> `PROXYDOCK_LOG_MAX_DAYS`
pub fn env_name(prefix: &str, flag_id: &str) -> String {
    let id: String = flag_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{}{}", prefix, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_name() {
        assert_eq!(env_name(ENV_PREFIX, "log-max-days"), "PROXYDOCK_LOG_MAX_DAYS");
        assert_eq!(env_name(ENV_PREFIX, "address"), "PROXYDOCK_ADDRESS");
        assert_eq!(env_name("X_", "ipv6-support"), "X_IPV6_SUPPORT");
    }

    #[test]
    fn test_config_dir_by_mode() {
        assert_eq!(config_dir(true), LITE_CONFIG_DIR);
        assert_eq!(config_dir(false), SYSTEM_CONFIG_DIR);
    }
}
