//! Shadowsocks and ShadowsocksR server descriptors

use serde::{Deserialize, Serialize};

/// SIP003 plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sip003 {
    pub name: String,
    /// Raw `k=v;k=v` option string
    #[serde(skip_serializing_if = "String::is_empty")]
    pub opts: String,
}

impl Sip003 {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.opts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Shadowsocks {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub password: String,
    pub cipher: String,
    #[serde(skip_serializing_if = "Sip003::is_empty")]
    pub plugin: Sip003,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub udp: bool,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ShadowsocksR {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub password: String,
    pub cipher: String,
    pub proto: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub proto_param: String,
    pub obfs: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub obfs_param: String,
    pub protocol: String,
}
