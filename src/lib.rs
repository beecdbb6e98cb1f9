//! Proxydock: bootstrap and record store core of a proxy manager
//!
//! This library resolves the process parameters and decodes persisted
//! subscription and server records.
//!
//! # Main Features
//!
//! - Parameter resolution with flag > `PROXYDOCK_*` environment > default precedence
//! - Config directory normalization and once-per-process startup side effects
//! - Two-pass decoding of multi-protocol server records through a protocol registry
//! - Decoding and migration of legacy VMess-only records
//!
//! # Example
//!
//! ```no_run
//! use proxydock::config::{self, ArgPolicy};
//! use proxydock::store::decode_subscription;
//!
//! fn main() -> proxydock::Result<()> {
//!     let params = config::initialize(std::env::args_os(), ArgPolicy::Strict)?;
//!
//!     let buf = std::fs::read(params.config_dir().join("subscription.json"))?;
//!     let subscription = decode_subscription(&buf)?;
//!     println!("{} servers", subscription.servers.len());
//!     Ok(())
//! }
//! ```

// Public modules
pub mod common;
pub mod config;
pub mod report;
pub mod server;
pub mod store;

// Re-export commonly used structures and functions for convenience
pub use common::{ProxydockError, Result};
pub use config::{params, Params};
pub use server::{registry, ProtocolRegistry, ServerDescriptor, ServerObj};
pub use store::{DecodeError, ServerRecord, Subscription};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
