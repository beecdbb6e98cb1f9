//! VMess / VLESS server descriptor

use serde::{Deserialize, Serialize};

/// VMess or VLESS server, in the share-link field layout
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct V2Ray {
    /// Remarks shown to the user
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ps: String,
    pub add: String,
    /// Kept as text; share links carry it either quoted or bare
    pub port: String,
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub aid: String,
    /// Transport: tcp, kcp, ws, h2, grpc
    #[serde(skip_serializing_if = "String::is_empty")]
    pub net: String,
    /// Header type
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sni: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tls: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flow: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alpn: String,
    #[serde(rename = "allowInsecure", skip_serializing_if = "std::ops::Not::not")]
    pub allow_insecure: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub v: String,
    /// `vmess` or `vless`
    pub protocol: String,
}

impl V2Ray {
    /// Numeric port, 0 when the stored text is not a port number
    pub fn port_number(&self) -> u16 {
        self.port.trim().parse().unwrap_or(0)
    }
}
