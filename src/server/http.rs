//! HTTP(S) and SOCKS5 proxy descriptors

use serde::{Deserialize, Serialize};

/// HTTP or HTTPS forward proxy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Http {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// `http` or `https`
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Socks5 {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub protocol: String,
}
