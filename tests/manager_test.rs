//! Test for once-per-process parameter resolution
//!
//! The process-wide snapshot and the global logger can only be set once, so
//! the whole lifecycle runs as a single test.

use std::env;
use std::fs;
use std::sync::Arc;

use proxydock::config::{self, ArgPolicy, ParamValues, ParamsBuilder, ValueSource, ASSET_ENV_VARS};

#[test]
fn test_resolution_lifecycle() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config_arg = tmp.path().join("proxy.dock");
    let config_dir = tmp.path().join("proxy_dock");
    let assets_dir = tmp.path().join("assets");
    let log_file = tmp.path().join("logs").join("proxydock.log");

    assert!(config::current().is_none());

    let args = vec![
        "proxydock".to_string(),
        "--config".to_string(),
        config_arg.display().to_string(),
        "--core-assetsdir".to_string(),
        assets_dir.display().to_string(),
        "--log-file".to_string(),
        log_file.display().to_string(),
        "--log-level".to_string(),
        "debug".to_string(),
    ];
    let builder = ParamsBuilder::new()
        .with_defaults()
        .with_cli(args, ArgPolicy::Strict)
        .with_home(Some(tmp.path().to_path_buf()));

    let first = config::initialize_with(builder).expect("Failed to resolve parameters");

    // Side effects of the first resolution
    assert_eq!(first.config_dir(), config_dir.as_path());
    assert!(config_dir.is_dir());
    assert!(log_file.parent().unwrap().is_dir());
    assert!(log_file.exists());
    for name in ASSET_ENV_VARS {
        assert_eq!(env::var(name).unwrap(), assets_dir.display().to_string());
    }

    // Later calls return the same snapshot and run nothing
    fs::remove_dir(&config_dir).unwrap();
    let second = config::initialize_with(
        ParamsBuilder::new().with_cli(["proxydock", "--address", "127.0.0.1:1"], ArgPolicy::Strict),
    )
    .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(!config_dir.exists());
    assert_eq!(second.address(), "0.0.0.0:2017");

    let third = config::initialize(["proxydock", "--bogus"], ArgPolicy::Strict).unwrap();
    assert!(Arc::ptr_eq(&first, &third));
    assert!(Arc::ptr_eq(&first, &config::current().unwrap()));

    // An override replaces the snapshot wholesale
    let values = ParamValues {
        address: Some("127.0.0.1:7777".to_string()),
        lite: Some(true),
        ..ParamValues::default()
    };
    let overridden = config::override_params(values);
    assert_eq!(overridden.address(), "127.0.0.1:7777");
    assert_eq!(overridden.source("lite"), Some(ValueSource::Override));

    let after = config::initialize(["proxydock"], ArgPolicy::Strict).unwrap();
    assert!(Arc::ptr_eq(&overridden, &after));
    assert!(!config_dir.exists());
}
