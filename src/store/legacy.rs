//! Legacy (V1) subscription and server records
//!
//! V1 predates multi-protocol support: every record is a VMess server stored
//! under `vmessInfo`, so no discriminator is read and no registry is involved.

use serde::{Deserialize, Serialize};

use crate::server::{ServerObj, V2Ray};
use crate::store::error::DecodeError;
use crate::store::raw::{ServerRecord, Subscription};

/// The fixed V1 descriptor; same field layout as [`V2Ray`]
pub type VmessInfo = V2Ray;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerRaw {
    #[serde(rename = "vmessInfo")]
    pub vmess_info: VmessInfo,
    pub latency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubscriptionRaw {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remarks: String,
    pub address: String,
    pub status: String,
    pub servers: Vec<ServerRaw>,
    pub info: String,
}

impl ServerRaw {
    /// Convert into the current record layout
    ///
    /// V1 records written before the protocol field existed get `vmess`.
    pub fn into_v2(self) -> ServerRecord {
        let mut info = self.vmess_info;
        if info.protocol.is_empty() {
            info.protocol = "vmess".to_string();
        }
        ServerRecord {
            server_obj: ServerObj::V2Ray(info),
            latency: self.latency,
        }
    }
}

impl SubscriptionRaw {
    /// Convert into the current record layout, keeping server order
    pub fn into_v2(self) -> Subscription {
        Subscription {
            remarks: self.remarks,
            address: self.address,
            status: self.status,
            servers: self.servers.into_iter().map(ServerRaw::into_v2).collect(),
            info: self.info,
        }
    }
}

/// Decode a V1 subscription
pub fn decode_legacy_subscription(buf: &[u8]) -> Result<SubscriptionRaw, DecodeError> {
    Ok(serde_json::from_slice(buf)?)
}

/// Decode a standalone V1 server record
pub fn decode_legacy_server_record(buf: &[u8]) -> Result<ServerRaw, DecodeError> {
    Ok(serde_json::from_slice(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerDescriptor;

    #[test]
    fn test_into_v2_sets_protocol() {
        let raw = ServerRaw {
            vmess_info: VmessInfo {
                ps: "hk".to_string(),
                add: "hk.example.com".to_string(),
                port: "443".to_string(),
                ..VmessInfo::default()
            },
            latency: "120ms".to_string(),
        };
        let record = raw.into_v2();
        assert_eq!(record.server_obj.protocol(), "vmess");
        assert_eq!(record.server_obj.name(), "hk");
        assert_eq!(record.latency, "120ms");
    }

    #[test]
    fn test_into_v2_keeps_vless() {
        let raw = ServerRaw {
            vmess_info: VmessInfo {
                protocol: "vless".to_string(),
                ..VmessInfo::default()
            },
            latency: String::new(),
        };
        assert_eq!(raw.into_v2().server_obj.protocol(), "vless");
    }

    #[test]
    fn test_legacy_ignores_registry() {
        // An unregistered protocol value is just data in V1
        let raw = decode_legacy_server_record(br#"{"vmessInfo": {"protocol": "gopher", "add": "h"}}"#).unwrap();
        assert_eq!(raw.vmess_info.protocol, "gopher");
    }
}
