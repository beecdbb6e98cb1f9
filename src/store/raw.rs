//! Current (V2) subscription and server records
//!
//! A V2 record embeds its descriptor under `serverObj`, and the concrete
//! descriptor type depends on `serverObj.protocol`. Decoding is two-pass:
//! the discriminators are read from the untyped document first, empty
//! descriptors are allocated through a [`ProtocolRegistry`], and only then
//! is the document decoded into those typed slots.

use std::mem;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::{registry, ProtocolRegistry, ServerDescriptor, ServerObj};
use crate::store::error::DecodeError;

/// JSON pointer of the discriminator inside one server record
const PROTOCOL_POINTER: &str = "/serverObj/protocol";

/// A server together with its last measured latency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerRecord {
    #[serde(rename = "serverObj")]
    pub server_obj: ServerObj,

    /// Display text, e.g. `"231ms"` or `"TIMEOUT"`
    pub latency: String,
}

impl ServerRecord {
    pub fn new(server_obj: impl Into<ServerObj>) -> Self {
        Self {
            server_obj: server_obj.into(),
            latency: String::new(),
        }
    }
}

/// A subscription and the servers it provided, in provider order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Subscription {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remarks: String,

    /// Subscription URL
    pub address: String,

    /// Last update time or error text
    pub status: String,

    pub servers: Vec<ServerRecord>,

    /// Free-form information from the provider
    pub info: String,
}

/// Wire shape of one server record before its descriptor is typed
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerEnvelope {
    #[serde(rename = "serverObj")]
    server_obj: Value,
    #[serde(default)]
    latency: String,
}

/// Wire shape of a subscription before its descriptors are typed
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubscriptionEnvelope {
    #[serde(default)]
    remarks: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    servers: Vec<ServerEnvelope>,
    #[serde(default)]
    info: String,
}

/// Read the discriminator of one server record without decoding it
fn discriminator(record: &Value) -> Result<&str, DecodeError> {
    match record.pointer(PROTOCOL_POINTER) {
        Some(Value::String(protocol)) => Ok(protocol),
        Some(other) => Err(DecodeError::UnknownProtocol(other.to_string())),
        None => Err(DecodeError::UnknownProtocol(String::new())),
    }
}

/// Allocate an empty descriptor for every server in the document
fn allocate_slots(registry: &ProtocolRegistry, doc: &Value) -> Result<Vec<ServerObj>, DecodeError> {
    let records: &[Value] = match doc.get("servers") {
        Some(Value::Array(records)) => records,
        // Anything but an array is rejected by the full decode
        _ => &[],
    };

    records
        .iter()
        .map(|record| discriminator(record).and_then(|protocol| registry.construct(protocol)))
        .collect()
}

/// Decode one envelope into its pre-allocated slot
fn fill_slot(mut slot: ServerObj, envelope: ServerEnvelope, context: &str) -> Result<ServerRecord, DecodeError> {
    slot.fill(envelope.server_obj)
        .map_err(|e| DecodeError::shape(context, e))?;
    Ok(ServerRecord {
        server_obj: slot,
        latency: envelope.latency,
    })
}

/// Decode a V2 subscription using the built-in protocol registry
pub fn decode_subscription(buf: &[u8]) -> Result<Subscription, DecodeError> {
    decode_subscription_with(registry(), buf)
}

/// Decode a V2 subscription using `registry` to type each server
pub fn decode_subscription_with(registry: &ProtocolRegistry, buf: &[u8]) -> Result<Subscription, DecodeError> {
    let doc: Value = serde_json::from_slice(buf).map_err(DecodeError::Malformed)?;

    let slots = allocate_slots(registry, &doc)?;

    let envelope = SubscriptionEnvelope::deserialize(doc)
        .map_err(|e| DecodeError::shape("subscription", e))?;

    // Both passes walk the same array, so the counts agree
    debug_assert_eq!(slots.len(), envelope.servers.len());

    let servers = slots
        .into_iter()
        .zip(envelope.servers)
        .enumerate()
        .map(|(i, (slot, server))| fill_slot(slot, server, &format!("servers[{}].serverObj", i)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Decoded subscription {} with {} servers", envelope.address, servers.len());

    Ok(Subscription {
        remarks: envelope.remarks,
        address: envelope.address,
        status: envelope.status,
        servers,
        info: envelope.info,
    })
}

/// Decode a standalone V2 server record using the built-in protocol registry
pub fn decode_server_record(buf: &[u8]) -> Result<ServerRecord, DecodeError> {
    decode_server_record_with(registry(), buf)
}

/// Decode a standalone V2 server record using `registry` to type it
pub fn decode_server_record_with(registry: &ProtocolRegistry, buf: &[u8]) -> Result<ServerRecord, DecodeError> {
    let doc: Value = serde_json::from_slice(buf).map_err(DecodeError::Malformed)?;

    let slot = registry.construct(discriminator(&doc)?)?;

    let envelope = ServerEnvelope::deserialize(doc)
        .map_err(|e| DecodeError::shape("server record", e))?;

    fill_slot(slot, envelope, "serverObj")
}

/// Check that `server_obj` decodes back as the same variant through `registry`
fn check_protocol(registry: &ProtocolRegistry, server_obj: &ServerObj) -> Result<(), DecodeError> {
    let protocol = server_obj.protocol();
    let slot = registry.construct(protocol)?;
    if mem::discriminant(&slot) != mem::discriminant(server_obj) {
        return Err(DecodeError::ProtocolMismatch(protocol.to_string()));
    }
    Ok(())
}

/// Encode a subscription in the V2 layout using the built-in protocol registry
pub fn encode_subscription(subscription: &Subscription) -> Result<Vec<u8>, DecodeError> {
    encode_subscription_with(registry(), subscription)
}

/// Encode a subscription in the V2 layout
///
/// Every server must carry a protocol that `registry` maps to its variant,
/// so the output decodes back with the same registry.
pub fn encode_subscription_with(registry: &ProtocolRegistry, subscription: &Subscription) -> Result<Vec<u8>, DecodeError> {
    for server in &subscription.servers {
        check_protocol(registry, &server.server_obj)?;
    }
    Ok(serde_json::to_vec(subscription)?)
}

/// Encode a server record in the V2 layout using the built-in protocol registry
pub fn encode_server_record(record: &ServerRecord) -> Result<Vec<u8>, DecodeError> {
    encode_server_record_with(registry(), record)
}

/// Encode a server record in the V2 layout, checked against `registry`
pub fn encode_server_record_with(registry: &ProtocolRegistry, record: &ServerRecord) -> Result<Vec<u8>, DecodeError> {
    check_protocol(registry, &record.server_obj)?;
    Ok(serde_json::to_vec(record)?)
}
