//! Boolean flags the API encodes as the strings `"true"` and `"false"`.
//!
//! ServeRest's `administrador` field is a string on both requests and
//! responses. Use with `#[serde(with = "crate::types::flag")]`.

use serde::{Deserialize, Deserializer, Serializer, de};

/// Serialize a `bool` as `"true"` / `"false"`.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by serde(with)
pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(as_str(*value))
}

/// Deserialize `"true"` / `"false"` into a `bool`.
///
/// # Errors
///
/// Fails on any other string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(&raw), &"\"true\" or \"false\""))
}

/// The wire form of a flag.
#[must_use]
pub const fn as_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Parse the wire form of a flag.
#[must_use]
pub fn parse(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
