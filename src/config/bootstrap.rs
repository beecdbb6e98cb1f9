//! Startup side effects
//!
//! Applies resolved parameters to the process: creates the config and log
//! directories, installs the logger and exports the core asset directory.

use std::env;
use std::path::Path;

use log::info;

use crate::common::{ensure_dir, init_logger};
use crate::config::defaults::ASSET_ENV_VARS;
use crate::config::error::{ConfigError, Result};
use crate::config::types::Params;

/// Run all startup side effects for `params`
pub fn bootstrap(params: &Params) -> Result<()> {
    create_dir(params.config_dir())?;

    if let Some(log_file) = params.log_file() {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }
    }

    let settings = params.log_settings();
    init_logger(&settings)?;
    info!("Logging to {} at level {}", settings.way, settings.level);

    if let Some(dir) = params.core_assetsdir() {
        export_assets_dir(dir)?;
    }

    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    ensure_dir(path)
        .map(|_| ())
        .map_err(|e| ConfigError::CreateDir(path.to_path_buf(), e.to_string()))
}

/// Export the asset directory to every variable the downstream cores read
pub fn export_assets_dir(dir: &Path) -> Result<()> {
    let value = dir.as_os_str();
    // set_var panics on NUL bytes
    if value.to_string_lossy().contains('\0') {
        return Err(ConfigError::SetEnv(
            ASSET_ENV_VARS.join(", "),
            "value contains a NUL byte".to_string(),
        ));
    }
    for name in ASSET_ENV_VARS {
        env::set_var(name, value);
    }
    info!("Core asset directory: {}", dir.display());
    Ok(())
}
