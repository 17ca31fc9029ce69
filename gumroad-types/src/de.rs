//! Lenient decoders for fields Gumroad encodes inconsistently.
//!
//! The verify endpoint sends `gumroad_fee` as a string while the charge
//! history sends it as a number, and webhook pings are form-encoded so every
//! flag arrives as `"true"` / `"false"` and an unset field as `""`.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes a non-negative amount sent as a number or a numeric string.
/// Missing and null values decode to zero.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    opt_amount(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn opt_amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            D::Error::custom(format!("amount must be a non-negative integer, got {n}"))
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid amount: {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("invalid amount: {other}"))),
    }
}

/// Decodes a boolean sent as a JSON bool or as `"true"` / `"false"`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) => match s.as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag: {other:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid flag: {other}"))),
    }
}

/// Decodes an RFC 3339 timestamp. Missing, null and empty values decode to
/// `None`.
pub(crate) fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| D::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        Some(other) => Err(D::Error::custom(format!("invalid timestamp: {other}"))),
    }
}
