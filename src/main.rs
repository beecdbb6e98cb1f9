//! Proxydock Command Line Tool
//!
//! Resolves the process parameters, answers `--version` and `--report`, and
//! logs the effective startup configuration.

use std::process;

use log::{error, info, warn};

use proxydock::{params, registry, report, APP_NAME, VERSION};

fn main() {
    // Exits on --version, --help and fatal configuration errors
    let params = params();

    if let Some(name) = params.report() {
        match report::generate(name, &params, registry()) {
            Ok(text) => {
                println!("{}", text);
                process::exit(0);
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("{}: {}", APP_NAME, e);
                process::exit(1);
            }
        }
    }

    info!("Starting {} v{}", APP_NAME, VERSION);
    info!("Listening address: {}", params.address());
    info!("IPv6 support: {}", params.ipv6_support());

    if params.lite() {
        info!("Lite mode enabled");
    } else if params.pass_check_root() {
        warn!("Privilege checking is skipped");
    }

    if params.reset_password() {
        info!("Password reset requested");
    }

    info!("Registered protocols: {}", registry().protocols().join(", "));
}
