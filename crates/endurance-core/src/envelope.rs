//! Outward JSON envelope.
//!
//! Every response is a flat JSON object: the discriminator key (`hasData` or
//! `status`), an optional `error` string, and the payload keys beside them.
//! Payload keys never collide with the envelope keys because both the live
//! payloads and the fallback table are built in this workspace.

use serde_json::{Map, Value};

use crate::endpoint::{Discriminator, Endpoint};

const HAS_DATA: &str = "hasData";
const STATUS: &str = "status";
const ERROR: &str = "error";

/// Live data for `endpoint`.
#[must_use]
pub fn live(endpoint: Endpoint, payload: Value) -> Value {
    let mut body = into_object(payload);
    match endpoint.discriminator() {
        Discriminator::HasData => body.insert(HAS_DATA.into(), Value::Bool(true)),
        Discriminator::Status => body.insert(STATUS.into(), Value::from("success")),
    };
    Value::Object(body)
}

/// The query succeeded but returned nothing. Carries the fallback payload
/// with no `error` key.
#[must_use]
pub fn empty(endpoint: Endpoint, fallback: Value) -> Value {
    let mut body = into_object(fallback);
    match endpoint.discriminator() {
        Discriminator::HasData => body.insert(HAS_DATA.into(), Value::Bool(false)),
        Discriminator::Status => body.insert(STATUS.into(), Value::from("success")),
    };
    Value::Object(body)
}

/// A backend call failed. Carries the fallback payload and the error text.
#[must_use]
pub fn degraded(endpoint: Endpoint, fallback: Value, error: &str) -> Value {
    let mut body = into_object(fallback);
    match endpoint.discriminator() {
        Discriminator::HasData => body.insert(HAS_DATA.into(), Value::Bool(false)),
        Discriminator::Status => body.insert(STATUS.into(), Value::from("error")),
    };
    let message = if error.trim().is_empty() {
        "unknown error"
    } else {
        error
    };
    body.insert(ERROR.into(), Value::from(message));
    Value::Object(body)
}

fn into_object(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".into(), other);
            map
        }
    }
}
