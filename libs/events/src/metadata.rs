//! Event context carried in RPC request metadata.
//!
//! Handlers receive the context attributes of the event they process as
//! `ce-*` metadata entries. Readers return the first value of a key, or an
//! empty value when it is absent.
//!
//! Time is written with second precision and read back leniently: an
//! unparsable value yields `None` instead of an error. The attribute-map codec
//! in [`crate::wire`] keeps nanoseconds and rejects malformed timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use tonic::metadata::{MetadataMap, MetadataValue};
use tracing::warn;

use crate::event::Event;

pub const EVENT_ID: &str = "ce-id";
pub const EVENT_TYPE: &str = "ce-type";
pub const EVENT_SOURCE: &str = "ce-source";
pub const EVENT_SUBJECT: &str = "ce-subject";
pub const EVENT_DATA_SCHEMA: &str = "ce-dataschema";
pub const EVENT_SPEC_VERSION: &str = "ce-specversion";
pub const EVENT_DATA_CONTENT_TYPE: &str = "ce-datacontenttype";
pub const EVENT_TIME: &str = "ce-time";

fn first_value<'a>(metadata: &'a MetadataMap, key: &'static str) -> &'a str {
    metadata
        .get(key)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub fn event_id(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_ID)
}

pub fn event_type(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_TYPE)
}

pub fn event_source(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_SOURCE)
}

pub fn event_subject(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_SUBJECT)
}

pub fn event_data_schema(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_DATA_SCHEMA)
}

pub fn event_data_content_type(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_DATA_CONTENT_TYPE)
}

pub fn event_spec_version(metadata: &MetadataMap) -> &str {
    first_value(metadata, EVENT_SPEC_VERSION)
}

/// The event time, if present and RFC 3339.
pub fn event_time(metadata: &MetadataMap) -> Option<DateTime<Utc>> {
    let value = first_value(metadata, EVENT_TIME);
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Writes the context attributes of `event` into `metadata`.
///
/// Existing `ce-*` entries are replaced. Empty attributes are skipped, and so
/// are values that are not valid ASCII metadata.
pub fn insert_event_metadata(metadata: &mut MetadataMap, event: &Event) {
    let time = event
        .time()
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    let entries = [
        (EVENT_ID, event.id()),
        (EVENT_TYPE, event.event_type()),
        (EVENT_SOURCE, event.source()),
        (EVENT_SUBJECT, event.subject()),
        (EVENT_DATA_SCHEMA, event.data_schema()),
        (EVENT_SPEC_VERSION, event.spec_version()),
        (EVENT_DATA_CONTENT_TYPE, event.data_content_type()),
        (EVENT_TIME, time.as_str()),
    ];

    for (key, value) in entries {
        metadata.remove(key);
        if value.is_empty() {
            continue;
        }

        match MetadataValue::try_from(value) {
            Ok(value) => {
                metadata.insert(key, value);
            }
            Err(_) => warn!(key, event.id = %event.id(), "skipping non-ASCII event metadata"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_absent_keys_are_empty() {
        let metadata = MetadataMap::new();
        assert_eq!(event_id(&metadata), "");
        assert_eq!(event_subject(&metadata), "");
        assert_eq!(event_time(&metadata), None);
    }

    #[test]
    fn test_first_value_wins() {
        let mut metadata = MetadataMap::new();
        metadata.append(EVENT_TYPE, MetadataValue::from_static("first"));
        metadata.append(EVENT_TYPE, MetadataValue::from_static("second"));
        assert_eq!(event_type(&metadata), "first");
    }

    #[test]
    fn test_event_time_is_lenient() {
        let mut metadata = MetadataMap::new();
        metadata.insert(EVENT_TIME, MetadataValue::from_static("yesterday"));
        assert_eq!(event_time(&metadata), None);

        metadata.insert(EVENT_TIME, MetadataValue::from_static("2024-03-01T08:30:00Z"));
        assert_eq!(
            event_time(&metadata),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_insert_event_metadata() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
            + chrono::Duration::milliseconds(750);
        let mut event = Event::builder()
            .id("evt-1")
            .event_type("order.created")
            .source("/orders")
            .subject("42")
            .time(ts)
            .data("hello")
            .build();
        event.set_data_schema("https://example.com/s");

        let mut metadata = MetadataMap::new();
        metadata.insert(EVENT_ID, MetadataValue::from_static("stale"));
        insert_event_metadata(&mut metadata, &event);

        assert_eq!(event_id(&metadata), "evt-1");
        assert_eq!(event_type(&metadata), "order.created");
        assert_eq!(event_source(&metadata), "/orders");
        assert_eq!(event_subject(&metadata), "42");
        assert_eq!(event_data_schema(&metadata), "https://example.com/s");
        assert_eq!(event_spec_version(&metadata), "1.0");
        assert_eq!(event_data_content_type(&metadata), "text/plain");
        assert_eq!(
            metadata.get(EVENT_TIME).unwrap().to_str().unwrap(),
            "2024-03-01T08:30:00Z"
        );
        assert_eq!(
            event_time(&metadata),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_non_ascii_values_are_skipped() {
        let event = Event::builder().id("evt-2").subject("grüße").build();
        let mut metadata = MetadataMap::new();
        insert_event_metadata(&mut metadata, &event);

        assert_eq!(event_id(&metadata), "evt-2");
        assert_eq!(event_subject(&metadata), "");
    }
}
