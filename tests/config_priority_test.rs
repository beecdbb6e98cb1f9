//! Test for parameter priority order
//!
//! Command line flags > PROXYDOCK_* environment variables > default values,
//! decided independently for every field.

use std::env;
use std::path::{Path, PathBuf};

use proxydock::config::{ArgPolicy, ConfigError, Ipv6Support, ParamsBuilder, ValueSource, ENV_PREFIX};
use serial_test::serial;

const VARS: [&str; 7] = [
    "PROXYDOCK_ADDRESS",
    "PROXYDOCK_CONFIG",
    "PROXYDOCK_LOG_LEVEL",
    "PROXYDOCK_LOG_MAX_DAYS",
    "PROXYDOCK_IPV6_SUPPORT",
    "PROXYDOCK_LITE",
    "PROXYDOCK_GRPC_INBOUND_CERT_KEY",
];

fn clear_env() {
    for name in VARS {
        env::remove_var(name);
    }
}

fn builder(args: &[&str]) -> ParamsBuilder {
    let mut full = vec!["proxydock"];
    full.extend_from_slice(args);
    ParamsBuilder::new()
        .with_defaults()
        .with_env(ENV_PREFIX)
        .with_cli(full, ArgPolicy::Strict)
        .with_home(Some(PathBuf::from("/home/tester")))
}

#[test]
#[serial]
fn test_flag_over_env_over_default() {
    clear_env();
    env::set_var("PROXYDOCK_ADDRESS", "127.0.0.1:3000");
    env::set_var("PROXYDOCK_LOG_LEVEL", "debug");
    env::set_var("PROXYDOCK_IPV6_SUPPORT", "off");

    let params = builder(&["--address", "127.0.0.1:4000"])
        .build()
        .expect("Failed to build parameters");

    // Flag wins over env
    assert_eq!(params.address(), "127.0.0.1:4000");
    assert_eq!(params.source("address"), Some(ValueSource::CommandLine));

    // Env wins over default
    assert_eq!(params.log_level(), "debug");
    assert_eq!(params.source("log-level"), Some(ValueSource::Environment));
    assert_eq!(params.ipv6_support(), Ipv6Support::Off);

    // Untouched fields keep their defaults
    assert_eq!(params.log_max_days(), 3);
    assert_eq!(params.source("log-max-days"), Some(ValueSource::Default));
    assert_eq!(params.config_dir(), Path::new("/etc/proxydock"));

    clear_env();
}

#[test]
#[serial]
fn test_empty_env_is_unset() {
    clear_env();
    env::set_var("PROXYDOCK_ADDRESS", "");
    env::set_var("PROXYDOCK_LOG_MAX_DAYS", "");

    let params = builder(&[]).build().unwrap();
    assert_eq!(params.address(), "0.0.0.0:2017");
    assert_eq!(params.source("address"), Some(ValueSource::Default));
    assert_eq!(params.log_max_days(), 3);

    clear_env();
}

#[test]
#[serial]
fn test_bad_env_value_is_fatal() {
    clear_env();
    env::set_var("PROXYDOCK_LITE", "maybe");
    let result = builder(&[]).build();
    assert!(matches!(result, Err(ConfigError::InvalidValue(name, _)) if name == "PROXYDOCK_LITE"));

    clear_env();
    env::set_var("PROXYDOCK_IPV6_SUPPORT", "sometimes");
    assert!(builder(&[]).build().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_env_lite_moves_config_dir() {
    clear_env();
    env::set_var("PROXYDOCK_LITE", "true");

    let params = builder(&[]).build().unwrap();
    assert!(params.lite());
    assert!(params.pass_check_root());
    assert_eq!(params.source("pass-check-root"), Some(ValueSource::Environment));
    assert_eq!(params.config_dir(), Path::new("/home/tester/.config/proxydock"));

    // An explicit flag turns lite mode back off
    let params = builder(&["--lite=false"]).build().unwrap();
    assert!(!params.lite());
    assert!(!params.pass_check_root());
    assert_eq!(params.config_dir(), Path::new("/etc/proxydock"));

    clear_env();
}

#[test]
#[serial]
fn test_env_list_value() {
    clear_env();
    env::set_var("PROXYDOCK_GRPC_INBOUND_CERT_KEY", "/etc/pd/grpc.crt, /etc/pd/grpc.key");

    let params = builder(&[]).build().unwrap();
    assert_eq!(params.grpc_inbound_cert_key(), ["/etc/pd/grpc.crt", "/etc/pd/grpc.key"]);

    let params = builder(&["--grpc-inbound-cert-key", "a.crt,a.key"]).build().unwrap();
    assert_eq!(params.grpc_inbound_cert_key(), ["a.crt", "a.key"]);

    clear_env();
}

#[test]
#[serial]
fn test_unknown_flag_policy() {
    clear_env();

    let strict = builder(&["--address", "127.0.0.1:5000", "--test.v"]).build();
    assert!(matches!(strict, Err(ConfigError::InvalidArgs(_))));

    let tolerant = ParamsBuilder::new()
        .with_defaults()
        .with_cli(["proxydock", "--address", "127.0.0.1:5000", "--test.v"], ArgPolicy::TolerateUnknown)
        .with_home(Some(PathBuf::from("/home/tester")))
        .build()
        .unwrap();
    assert_eq!(tolerant.address(), "127.0.0.1:5000");
}
