//! Server descriptors
//!
//! A server record stores its protocol-specific fields under `serverObj`,
//! together with a `protocol` discriminator. [`ServerObj`] is the closed set
//! of concrete descriptors; [`registry`] maps discriminators to empty
//! descriptors of the right variant.

mod http;
mod shadowsocks;
mod trojan;
mod v2ray;

pub mod registry;

pub use self::http::{Http, Socks5};
pub use self::registry::{registry, Constructor, ProtocolRegistry};
pub use self::shadowsocks::{Shadowsocks, ShadowsocksR, Sip003};
pub use self::trojan::Trojan;
pub use self::v2ray::V2Ray;

use serde::Serialize;
use serde_json::Value;

/// Capabilities shared by every server descriptor
pub trait ServerDescriptor {
    /// Protocol identifier stored in the record
    fn protocol(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Server host name or address
    fn hostname(&self) -> &str;

    fn port(&self) -> u16;

    /// Serialize to the common record shape
    fn to_value(&self) -> serde_json::Result<Value>;
}

macro_rules! impl_descriptor {
    ($ty:ty, $name:ident, $host:ident) => {
        impl ServerDescriptor for $ty {
            fn protocol(&self) -> &str {
                &self.protocol
            }

            fn name(&self) -> &str {
                &self.$name
            }

            fn hostname(&self) -> &str {
                &self.$host
            }

            fn port(&self) -> u16 {
                self.port
            }

            fn to_value(&self) -> serde_json::Result<Value> {
                serde_json::to_value(self)
            }
        }
    };
}

impl_descriptor!(Shadowsocks, name, server);
impl_descriptor!(ShadowsocksR, name, server);
impl_descriptor!(Trojan, name, server);
impl_descriptor!(Http, name, server);
impl_descriptor!(Socks5, name, server);

impl ServerDescriptor for V2Ray {
    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn name(&self) -> &str {
        &self.ps
    }

    fn hostname(&self) -> &str {
        &self.add
    }

    fn port(&self) -> u16 {
        self.port_number()
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// A concrete server descriptor
///
/// Serializes as the inner descriptor. It has no `Deserialize` impl: the
/// variant is chosen from the discriminator through a [`ProtocolRegistry`]
/// and then filled with [`ServerObj::fill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerObj {
    V2Ray(V2Ray),
    Shadowsocks(Shadowsocks),
    ShadowsocksR(ShadowsocksR),
    Trojan(Trojan),
    Http(Http),
    Socks5(Socks5),
}

impl ServerObj {
    fn inner(&self) -> &dyn ServerDescriptor {
        match self {
            ServerObj::V2Ray(s) => s,
            ServerObj::Shadowsocks(s) => s,
            ServerObj::ShadowsocksR(s) => s,
            ServerObj::Trojan(s) => s,
            ServerObj::Http(s) => s,
            ServerObj::Socks5(s) => s,
        }
    }

    /// Decode `value` into this slot, keeping the variant
    ///
    /// Fields of a different protocol, or values of the wrong type, are an error.
    pub fn fill(&mut self, value: Value) -> serde_json::Result<()> {
        match self {
            ServerObj::V2Ray(s) => *s = serde_json::from_value(value)?,
            ServerObj::Shadowsocks(s) => *s = serde_json::from_value(value)?,
            ServerObj::ShadowsocksR(s) => *s = serde_json::from_value(value)?,
            ServerObj::Trojan(s) => *s = serde_json::from_value(value)?,
            ServerObj::Http(s) => *s = serde_json::from_value(value)?,
            ServerObj::Socks5(s) => *s = serde_json::from_value(value)?,
        }
        Ok(())
    }
}

impl ServerDescriptor for ServerObj {
    fn protocol(&self) -> &str {
        self.inner().protocol()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn hostname(&self) -> &str {
        self.inner().hostname()
    }

    fn port(&self) -> u16 {
        self.inner().port()
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        self.inner().to_value()
    }
}

impl From<V2Ray> for ServerObj {
    fn from(s: V2Ray) -> Self {
        ServerObj::V2Ray(s)
    }
}

impl From<Shadowsocks> for ServerObj {
    fn from(s: Shadowsocks) -> Self {
        ServerObj::Shadowsocks(s)
    }
}

impl From<ShadowsocksR> for ServerObj {
    fn from(s: ShadowsocksR) -> Self {
        ServerObj::ShadowsocksR(s)
    }
}

impl From<Trojan> for ServerObj {
    fn from(s: Trojan) -> Self {
        ServerObj::Trojan(s)
    }
}

impl From<Http> for ServerObj {
    fn from(s: Http) -> Self {
        ServerObj::Http(s)
    }
}

impl From<Socks5> for ServerObj {
    fn from(s: Socks5) -> Self {
        ServerObj::Socks5(s)
    }
}
