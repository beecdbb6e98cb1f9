//! `--report` output
//!
//! Reports are printed by the binary and the process exits with status 0.

use chrono::Utc;
use serde_json::json;

use crate::config::{ConfigError, Params};
use crate::server::ProtocolRegistry;

/// Known report names
pub const REPORTS: [&str; 2] = ["config", "protocols"];

/// Render the report called `name`
pub fn generate(name: &str, params: &Params, registry: &ProtocolRegistry) -> Result<String, ConfigError> {
    let report = match name {
        "config" => json!({
            "generated": Utc::now().to_rfc3339(),
            "version": crate::VERSION,
            "parameters": params,
            "sources": params.sources,
        }),
        "protocols" => json!({
            "generated": Utc::now().to_rfc3339(),
            "protocols": registry.protocols(),
        }),
        _ => {
            return Err(ConfigError::InvalidValue(
                "report".to_string(),
                format!("{}. Valid values are: {}", name, REPORTS.join(", ")),
            ))
        }
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| ConfigError::InvalidValue("report".to_string(), e.to_string()))
}
