//! Attribute values - the closed set of CloudEvents attribute kinds.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EventError;

/// A typed CloudEvents attribute value.
///
/// Exactly one kind is held. Every kind has a canonical string form, which is
/// what flat string-keyed transports carry (see [`AttributeValue::to_wire_string`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i32),
    /// Raw bytes; base64 is applied only when rendered as a string.
    Bytes(Vec<u8>),
    String(String),
    /// Absolute or relative URI.
    Uri(String),
    /// URI reference.
    UriRef(String),
    Timestamp(DateTime<Utc>),
}

impl AttributeValue {
    /// Short name of the held kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Bytes(_) => "bytes",
            AttributeValue::String(_) => "string",
            AttributeValue::Uri(_) => "uri",
            AttributeValue::UriRef(_) => "uri-reference",
            AttributeValue::Timestamp(_) => "timestamp",
        }
    }

    /// Renders the value the way `ce-*` attribute maps carry it.
    pub fn to_wire_string(&self) -> String {
        match self {
            AttributeValue::Boolean(v) => v.to_string(),
            AttributeValue::Integer(v) => v.to_string(),
            AttributeValue::Bytes(v) => STANDARD.encode(v),
            AttributeValue::String(v) | AttributeValue::Uri(v) | AttributeValue::UriRef(v) => {
                v.clone()
            }
            AttributeValue::Timestamp(v) => format_timestamp(v),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            AttributeValue::Uri(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            AttributeValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(value: &[u8]) -> Self {
        AttributeValue::Bytes(value.to_vec())
    }
}

impl From<url::Url> for AttributeValue {
    fn from(value: url::Url) -> Self {
        AttributeValue::Uri(value.to_string())
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(value)
    }
}

impl TryFrom<prost_types::Timestamp> for AttributeValue {
    type Error = EventError;

    fn try_from(value: prost_types::Timestamp) -> Result<Self, Self::Error> {
        timestamp_from_proto(&value).map(AttributeValue::Timestamp)
    }
}

/// Formats a timestamp as UTC RFC 3339 with nanoseconds, trailing zeros trimmed.
///
/// `2024-05-01T10:00:00.5Z`, `2024-05-01T10:00:00Z`.
///
/// RFC 3339 only has four-digit years. Instants outside `0000-01-01T00:00:00Z`
/// through `9999-12-31T23:59:59.999999999Z` are clamped to that range, so the
/// output always parses back with [`parse_timestamp`].
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    let value = clamp_to_rfc3339(*value);
    let mut out = value.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = value.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

fn clamp_to_rfc3339(value: DateTime<Utc>) -> DateTime<Utc> {
    let min = NaiveDate::from_ymd_opt(0, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    let max = NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999));

    match (min, max) {
        (Some(min), _) if value.naive_utc() < min => min.and_utc(),
        (_, Some(max)) if value.naive_utc() > max => max.and_utc(),
        _ => value,
    }
}

/// Parses an RFC 3339 timestamp (fractional seconds optional) into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, EventError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| EventError::MalformedTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn timestamp_from_proto(
    value: &prost_types::Timestamp,
) -> Result<DateTime<Utc>, EventError> {
    u32::try_from(value.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(value.seconds, nanos))
        .ok_or_else(|| EventError::MalformedTimestamp {
            value: value.to_string(),
            reason: "out of range".to_string(),
        })
}

pub(crate) fn timestamp_to_proto(value: &DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: value.timestamp(),
        nanos: value.timestamp_subsec_nanos() as i32,
    }
}
