//! Persisted record store formats
//!
//! Two schema versions coexist on disk and have separate entry points; the
//! caller knows which one it is reading.
//!
//! - [`raw`]: the current multi-protocol layout (`serverObj` + discriminator)
//! - [`legacy`]: the VMess-only layout (`vmessInfo`)

pub mod error;
pub mod legacy;
pub mod raw;

pub use self::error::DecodeError;
pub use self::legacy::{
    decode_legacy_server_record, decode_legacy_subscription, ServerRaw, SubscriptionRaw, VmessInfo,
};
pub use self::raw::{
    decode_server_record, decode_server_record_with, decode_subscription, decode_subscription_with,
    encode_server_record, encode_server_record_with, encode_subscription, encode_subscription_with,
    ServerRecord, Subscription,
};
