//! Protocol registry
//!
//! Maps a protocol identifier to a constructor of an empty descriptor of the
//! matching variant. The global registry is built once and only read
//! afterwards, so lookups need no locking.

use std::collections::HashMap;

use log::trace;
use once_cell::sync::Lazy;

use crate::server::{Http, ServerObj, Shadowsocks, ShadowsocksR, Socks5, Trojan, V2Ray};
use crate::store::DecodeError;

/// Builds an empty descriptor; receives the protocol id it was registered under
pub type Constructor = fn(&str) -> ServerObj;

/// Protocol id → descriptor constructor
#[derive(Clone, Default)]
pub struct ProtocolRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ProtocolRegistry {
    /// Registry with no protocols
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in protocol
    pub fn builtin() -> Self {
        fn v2ray(protocol: &str) -> ServerObj {
            ServerObj::V2Ray(V2Ray { protocol: protocol.to_string(), ..V2Ray::default() })
        }
        fn shadowsocks(protocol: &str) -> ServerObj {
            ServerObj::Shadowsocks(Shadowsocks { protocol: protocol.to_string(), ..Shadowsocks::default() })
        }
        fn shadowsocksr(protocol: &str) -> ServerObj {
            ServerObj::ShadowsocksR(ShadowsocksR { protocol: protocol.to_string(), ..ShadowsocksR::default() })
        }
        fn trojan(protocol: &str) -> ServerObj {
            ServerObj::Trojan(Trojan { protocol: protocol.to_string(), ..Trojan::default() })
        }
        fn http(protocol: &str) -> ServerObj {
            ServerObj::Http(Http { protocol: protocol.to_string(), ..Http::default() })
        }
        fn socks5(protocol: &str) -> ServerObj {
            ServerObj::Socks5(Socks5 { protocol: protocol.to_string(), ..Socks5::default() })
        }

        Self::empty()
            .register("vmess", v2ray)
            .register("vless", v2ray)
            .register("ss", shadowsocks)
            .register("shadowsocks", shadowsocks)
            .register("ssr", shadowsocksr)
            .register("shadowsocksr", shadowsocksr)
            .register("trojan", trojan)
            .register("trojan-go", trojan)
            .register("http", http)
            .register("https", http)
            .register("socks5", socks5)
    }

    /// Register `constructor` under `protocol`, replacing any previous entry
    pub fn register(mut self, protocol: &str, constructor: Constructor) -> Self {
        self.constructors.insert(protocol.to_string(), constructor);
        self
    }

    /// Create an empty descriptor for `protocol`
    pub fn construct(&self, protocol: &str) -> Result<ServerObj, DecodeError> {
        match self.constructors.get(protocol) {
            Some(constructor) => {
                trace!("Constructing descriptor for protocol {}", protocol);
                Ok(constructor(protocol))
            }
            None => Err(DecodeError::UnknownProtocol(protocol.to_string())),
        }
    }

    /// Registered protocol ids, sorted
    pub fn protocols(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolRegistry")
            .field("protocols", &self.protocols())
            .finish()
    }
}

static REGISTRY: Lazy<ProtocolRegistry> = Lazy::new(ProtocolRegistry::builtin);

/// The process-wide registry of built-in protocols
pub fn registry() -> &'static ProtocolRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerDescriptor;

    #[test]
    fn test_construct_builtin() {
        let obj = registry().construct("vless").unwrap();
        assert!(matches!(obj, ServerObj::V2Ray(_)));
        assert_eq!(obj.protocol(), "vless");

        let obj = registry().construct("trojan-go").unwrap();
        assert!(matches!(obj, ServerObj::Trojan(_)));
        assert_eq!(obj.name(), "");
        assert_eq!(obj.port(), 0);
    }

    #[test]
    fn test_construct_unknown() {
        assert!(matches!(
            registry().construct("gopher"),
            Err(DecodeError::UnknownProtocol(p)) if p == "gopher"
        ));
        // Lookup is exact
        assert!(registry().construct("VMESS").is_err());
        assert!(registry().construct("").is_err());
    }

    #[test]
    fn test_custom_registry() {
        let only_socks = ProtocolRegistry::empty()
            .register("socks5", |p| ServerObj::Socks5(Socks5 { protocol: p.to_string(), ..Socks5::default() }));
        assert!(only_socks.construct("socks5").is_ok());
        assert!(only_socks.construct("vmess").is_err());
        assert_eq!(only_socks.protocols(), vec!["socks5"]);
    }

    #[test]
    fn test_builtin_protocols_sorted() {
        let ids = registry().protocols();
        assert_eq!(ids.first(), Some(&"http"));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), 11);
    }
}
