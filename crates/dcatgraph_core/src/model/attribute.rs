//! Store-level attribute values.
//!
//! # Responsibility
//! - Represent the loosely typed vertex attribute map as a closed union.
//! - Own the fixed timestamp literal format used at the storage boundary.
//!
//! # Invariants
//! - `TimestampLiteral` can only be built from a typed instant, so it always
//!   matches `TIMESTAMP_FORMAT`.
//! - Serialized values are plain JSON strings or arrays of strings.

use chrono::NaiveDateTime;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Literal format for timestamps stored as vertex attributes.
///
/// No timezone, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Attribute name to value mapping of one vertex, ordered by name.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// Formats an instant with [`TIMESTAMP_FORMAT`]. Sub-second components are
/// dropped.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a [`TIMESTAMP_FORMAT`] literal back into an instant.
///
/// Only the exact literal `format_timestamp` produces is accepted: no
/// unpadded fields, extra whitespace or sign.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(TimestampError::Unparsable)?;
    if format_timestamp(&parsed) != value {
        return Err(TimestampError::NonCanonical);
    }
    Ok(parsed)
}

/// Text that is not a storage timestamp literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    Unparsable(chrono::ParseError),
    /// Parsable, but not written as `YYYY-MM-DD HH:MM:SS`.
    NonCanonical,
}

impl Display for TimestampError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparsable(err) => write!(f, "{err}"),
            Self::NonCanonical => write!(f, "expected the form `YYYY-MM-DD HH:MM:SS`"),
        }
    }
}

impl Error for TimestampError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unparsable(err) => Some(err),
            Self::NonCanonical => None,
        }
    }
}

/// The epoch instant `1970-01-01 00:00:00`, default for unset timestamps.
pub fn epoch() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Timestamp already rendered in the storage literal format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampLiteral(String);

impl TimestampLiteral {
    pub fn from_datetime(value: &NaiveDateTime) -> Self {
        Self(format_timestamp(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TimestampLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// One vertex attribute value.
///
/// The store only ever sees strings and lists of strings; the `Timestamp`
/// variant marks values produced by the codec from typed instants. Values
/// read back from a store arrive as `Text` and are parsed by the codec
/// according to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    List(Vec<String>),
    Timestamp(TimestampLiteral),
}

impl AttrValue {
    /// Short variant name used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Returns the scalar string form for `Text` and `Timestamp` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Timestamp(value) => Some(value.as_str()),
            Self::List(_) => None,
        }
    }

}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<TimestampLiteral> for AttrValue {
    fn from(value: TimestampLiteral) -> Self {
        Self::Timestamp(value)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Timestamp(value) => serializer.serialize_str(value.as_str()),
            Self::List(values) => serializer.collect_seq(values),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttrValue {
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawAttrValue::deserialize(deserializer)? {
            RawAttrValue::Text(value) => Self::Text(value),
            RawAttrValue::List(values) => Self::List(values),
        })
    }
}

/// Serde adapter for record timestamps in request/response documents.
///
/// Serializes as ISO-8601 without offset (`2024-01-31T08:30:00`). Accepts that
/// form (with optional fraction) and the storage literal on input.
pub mod document_timestamp {
    use super::parse_timestamp;
    use chrono::NaiveDateTime;
    use serde::de::{Deserialize, Deserializer, Error};
    use serde::ser::Serializer;

    const DOCUMENT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DOCUMENT_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.as_str(), DOCUMENT_FORMAT)
            .or_else(|_| parse_timestamp(raw.as_str()))
            .map_err(|err| D::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
    }
}
