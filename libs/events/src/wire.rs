//! Attribute wire codec - events as flat `ce-*` string maps.
//!
//! This is the attribute layout used by attribute-map transports such as
//! Pub/Sub messages: every context attribute and extension becomes one
//! `ce-<lowercase name>` entry rendered with [`AttributeValue::to_wire_string`].

use std::collections::HashMap;

use crate::attribute::{parse_timestamp, AttributeValue};
use crate::error::EventError;
use crate::event::{attributes, Event};

/// Prefix of every attribute key on the wire.
pub const ATTRIBUTE_PREFIX: &str = "ce-";

/// Wire key for an attribute name.
pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}").to_ascii_lowercase()
}

/// Flattens the context attributes and extensions of an event.
///
/// `ce-id`, `ce-type`, `ce-source` and `ce-specversion` are always present,
/// even when empty.
pub fn to_wire_attributes(event: &Event) -> HashMap<String, String> {
    let mut wire: HashMap<String, String> = event
        .attributes()
        .iter()
        .map(|(name, value)| (attribute_key(name), value.to_wire_string()))
        .collect();

    wire.insert(attribute_key(attributes::ID), event.id().to_string());
    wire.insert(
        attribute_key(attributes::TYPE),
        event.event_type().to_string(),
    );
    wire.insert(attribute_key(attributes::SOURCE), event.source().to_string());
    wire.insert(
        attribute_key(attributes::SPEC_VERSION),
        event.spec_version().to_string(),
    );

    wire
}

/// Builds an event from a flat attribute map.
///
/// Identity fields missing from the map keep the [`Event::new`] defaults.
pub fn from_wire_attributes<I, K, V>(wire: I) -> Result<Event, EventError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut event = Event::new();
    event.apply_wire_attributes(wire)?;
    Ok(event)
}

impl Event {
    /// Applies a flat attribute map to this event.
    ///
    /// Keys are matched case-insensitively and the `ce-` prefix is optional.
    /// Keys without a dedicated setter become string extensions.
    ///
    /// Not atomic: a malformed `time` aborts with
    /// [`EventError::MalformedTimestamp`], and the entries visited before it
    /// (in the map's iteration order) stay applied.
    pub fn apply_wire_attributes<I, K, V>(&mut self, wire: I) -> Result<(), EventError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in wire {
            let key = key.as_ref().to_ascii_lowercase();
            let name = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(&key);
            let value = value.into();

            match name {
                attributes::ID => self.set_id(value),
                attributes::TYPE => self.set_type(value),
                attributes::SUBJECT => self.set_subject(value),
                attributes::SOURCE => self.set_source(value),
                attributes::SPEC_VERSION => self.set_spec_version(value),
                attributes::DATA_SCHEMA => self.set_data_schema(value),
                attributes::DATA_CONTENT_TYPE => self.set_data_content_type(value),
                attributes::TIME => self.set_time(parse_timestamp(&value)?),
                _ => self.set_extension(name, AttributeValue::String(value)),
            }
        }

        Ok(())
    }
}
