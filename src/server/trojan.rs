//! Trojan / Trojan-Go server descriptor

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Trojan {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sni: String,
    /// Trojan-Go transport: original or ws
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Trojan-Go `ss;method:password` layer
    #[serde(skip_serializing_if = "String::is_empty")]
    pub encryption: String,
    #[serde(rename = "allowInsecure", skip_serializing_if = "std::ops::Not::not")]
    pub allow_insecure: bool,
    pub protocol: String,
}
