//! Parameter manager
//!
//! Holds the process-wide parameter snapshot. Resolution and its side effects
//! run once per process behind a mutex; every caller, including concurrent
//! first callers, receives the same `Arc<Params>`.

use std::ffi::OsString;
use std::process;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::info;
use once_cell::sync::Lazy;

use crate::config::bootstrap::bootstrap;
use crate::config::builder::ParamsBuilder;
use crate::config::defaults::ENV_PREFIX;
use crate::config::error::{ConfigError, Result};
use crate::config::source::ArgPolicy;
use crate::config::types::{ParamValues, Params, ValueSource};

/// Global parameter manager
struct ParamsManager {
    /// Current snapshot, `None` until resolved or overridden
    current: RwLock<Option<Arc<Params>>>,

    /// Serializes first-time resolution
    init_guard: Mutex<()>,

    /// Side effects applied to the first resolved snapshot
    bootstrap: fn(&Params) -> Result<()>,
}

impl ParamsManager {
    fn new() -> Self {
        Self::with_bootstrap(bootstrap)
    }

    fn with_bootstrap(bootstrap: fn(&Params) -> Result<()>) -> Self {
        Self {
            current: RwLock::new(None),
            init_guard: Mutex::new(()),
            bootstrap,
        }
    }

    fn current(&self) -> Option<Arc<Params>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, params: Arc<Params>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(params);
    }

    fn initialize(&self, builder: ParamsBuilder) -> Result<Arc<Params>> {
        if let Some(params) = self.current() {
            return Ok(params);
        }

        let _guard = self.init_guard.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished while we waited
        if let Some(params) = self.current() {
            return Ok(params);
        }

        let params = builder.build()?;
        (self.bootstrap)(&params)?;

        info!("Configuration directory: {}", params.config_dir().display());
        params.log();

        let params = Arc::new(params);
        self.replace(Arc::clone(&params));
        Ok(params)
    }
}

static PARAMS_MANAGER: Lazy<ParamsManager> = Lazy::new(ParamsManager::new);

/// Resolve the process parameters from defaults, `PROXYDOCK_*` variables and `args`
///
/// Runs resolution and its side effects at most once per process. Later calls
/// return the cached snapshot and ignore their arguments. `--version` yields
/// [`ConfigError::VersionRequested`] before any side effect.
pub fn initialize<I, T>(args: I, policy: ArgPolicy) -> Result<Arc<Params>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let builder = ParamsBuilder::new()
        .with_defaults()
        .with_env(ENV_PREFIX)
        .with_cli(args, policy);
    PARAMS_MANAGER.initialize(builder)
}

/// Resolve with a caller-supplied builder, e.g. one with a fixed home directory
pub fn initialize_with(builder: ParamsBuilder) -> Result<Arc<Params>> {
    PARAMS_MANAGER.initialize(builder)
}

/// Get the process parameters, resolving them from the real command line on first use
///
/// This is the process entry point: it never returns an error. A version or
/// help request prints and exits with status 0, any other error prints a
/// diagnostic and exits with status 1.
pub fn params() -> Arc<Params> {
    match initialize(std::env::args_os(), ArgPolicy::Strict) {
        Ok(params) => params,
        Err(ConfigError::VersionRequested) => {
            println!("{}", crate::VERSION);
            process::exit(0);
        }
        Err(ConfigError::HelpRequested(help)) => {
            println!("{}", help);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", crate::APP_NAME, e);
            process::exit(1);
        }
    }
}

/// Get the current snapshot without resolving
pub fn current() -> Option<Arc<Params>> {
    PARAMS_MANAGER.current()
}

/// Replace the snapshot wholesale, bypassing resolution
///
/// Meant for test isolation. No side effects run and later calls to
/// [`initialize`] return this snapshot.
pub fn override_params(values: ParamValues) -> Arc<Params> {
    let params = Arc::new(Params::from_values(values, ValueSource::Override));
    PARAMS_MANAGER.replace(Arc::clone(&params));
    params
}
