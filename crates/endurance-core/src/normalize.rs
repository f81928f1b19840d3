//! Row value normalization.
//!
//! The three stores hand back numbers in different encodings:
//! - Postgres rows decode straight into Rust numbers (SQL casts to `float8`/`bigint`).
//! - ClickHouse's JSON format quotes 64-bit integers: `"count": "17"`.
//! - Neo4j driver-style integers arrive wrapped: `{"low": 17, "high": 0}`.
//!
//! These helpers flatten all of them into plain finite numbers, defaulting
//! to 0 for anything missing or unparseable.

use serde_json::{Map, Value};

use crate::math::finite_or_zero;

/// Coerce any JSON value to a finite `f64`. Unknown shapes become 0.
#[must_use]
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map_or(0.0, finite_or_zero),
        Value::String(s) => s.trim().parse::<f64>().map_or(0.0, finite_or_zero),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Object(map) => wrapped_integer(map).map_or(0.0, |i| {
            #[allow(clippy::cast_precision_loss)]
            let f = i as f64;
            f
        }),
        Value::Null | Value::Array(_) => 0.0,
    }
}

/// Coerce any JSON value to an `i64`, truncating fractional parts.
#[must_use]
pub fn integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| truncate(number(value))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .unwrap_or_else(|_| truncate(number(value))),
        Value::Object(map) => wrapped_integer(map).unwrap_or(0),
        _ => truncate(number(value)),
    }
}

/// Coerce to a display string. Null becomes empty; numbers are formatted.
#[must_use]
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(map) if wrapped_integer(map).is_some() => integer(value).to_string(),
        other => other.to_string(),
    }
}

/// `number(row[key])`, 0 when the key is absent.
#[must_use]
pub fn field_number(row: &Map<String, Value>, key: &str) -> f64 {
    row.get(key).map_or(0.0, number)
}

/// `integer(row[key])`, 0 when the key is absent.
#[must_use]
pub fn field_integer(row: &Map<String, Value>, key: &str) -> i64 {
    row.get(key).map_or(0, integer)
}

/// `text(row[key])`, empty when the key is absent.
#[must_use]
pub fn field_text(row: &Map<String, Value>, key: &str) -> String {
    row.get(key).map(text).unwrap_or_default()
}

/// Decode the `{low, high}` pair used by Neo4j drivers for 64-bit integers.
fn wrapped_integer(map: &Map<String, Value>) -> Option<i64> {
    if map.len() != 2 {
        return None;
    }
    let low = map.get("low")?.as_i64()?;
    let high = map.get("high")?.as_i64()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let low = i64::from(low as u32);
    Some((high << 32) | low)
}

#[allow(clippy::cast_possible_truncation)]
const fn truncate(value: f64) -> i64 {
    value as i64
}
