//! The event entity and its attribute accessors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::attribute::AttributeValue;
use crate::data::{Data, EventData};

/// CloudEvents specification version emitted by default.
pub const SPEC_VERSION: &str = "1.0";

/// Names of the context attributes kept in the attribute map.
pub mod attributes {
    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const SOURCE: &str = "source";
    pub const SPEC_VERSION: &str = "specversion";
    pub const SUBJECT: &str = "subject";
    pub const TIME: &str = "time";
    pub const DATA_SCHEMA: &str = "dataschema";
    pub const DATA_CONTENT_TYPE: &str = "datacontenttype";
}

/// A CloudEvent.
///
/// `id`, `type`, `source` and `specversion` are dedicated fields. Every other
/// context attribute (`subject`, `time`, `dataschema`, `datacontenttype`) and
/// every extension lives in the attribute map and is reached through typed
/// accessors.
///
/// An event is not synchronized; build one per request.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: String,
    event_type: String,
    source: String,
    spec_version: String,
    attributes: HashMap<String, AttributeValue>,
    data: Option<Data>,
}

impl Event {
    /// Creates an event with a fresh id and spec version `1.0`.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            event_type: String::new(),
            source: String::new(),
            spec_version: SPEC_VERSION.to_string(),
            attributes: HashMap::new(),
            data: None,
        }
    }

    /// Creates a new event builder.
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, value: impl Into<String>) {
        self.id = value.into();
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn set_type(&mut self, value: impl Into<String>) {
        self.event_type = value.into();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, value: impl Into<String>) {
        self.source = value.into();
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn set_spec_version(&mut self, value: impl Into<String>) {
        self.spec_version = value.into();
    }

    /// The subject of the event in the context of the producer, or `""`.
    pub fn subject(&self) -> &str {
        self.string_attribute(attributes::SUBJECT)
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.attributes.insert(
            attributes::SUBJECT.to_string(),
            AttributeValue::String(value.into()),
        );
    }

    /// When the occurrence happened, if recorded.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.attributes
            .get(attributes::TIME)
            .and_then(AttributeValue::as_timestamp)
    }

    pub fn set_time(&mut self, value: DateTime<Utc>) {
        self.attributes.insert(
            attributes::TIME.to_string(),
            AttributeValue::Timestamp(value),
        );
    }

    /// The schema the data adheres to, or `""`.
    pub fn data_schema(&self) -> &str {
        self.attributes
            .get(attributes::DATA_SCHEMA)
            .and_then(AttributeValue::as_uri)
            .unwrap_or_default()
    }

    /// Sets the data schema.
    ///
    /// A value that does not parse as a URI reference is dropped and the
    /// previous schema, if any, is kept.
    pub fn set_data_schema(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !is_uri_reference(&value) {
            debug!(dataschema = %value, "dropping dataschema that is not a URI reference");
            return;
        }

        self.attributes.insert(
            attributes::DATA_SCHEMA.to_string(),
            AttributeValue::Uri(value),
        );
    }

    /// The content type of the data, or `""`.
    pub fn data_content_type(&self) -> &str {
        self.string_attribute(attributes::DATA_CONTENT_TYPE)
    }

    pub fn set_data_content_type(&mut self, value: impl Into<String>) {
        self.attributes.insert(
            attributes::DATA_CONTENT_TYPE.to_string(),
            AttributeValue::String(value.into()),
        );
    }

    /// Returns an extension (or optional context attribute) by name.
    pub fn extension(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    /// Sets an extension attribute. The name is stored lowercase.
    pub fn set_extension(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn remove_extension(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    /// All attributes besides `id`, `type`, `source` and `specversion`.
    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }

    pub(crate) fn replace_data(&mut self, data: Option<Data>) {
        self.data = data;
    }

    /// Ordering key used by ordered transports. Every event orders on its own id.
    pub fn ordering_key(&self) -> &str {
        &self.id
    }

    fn string_attribute(&self, name: &str) -> &str {
        self.attributes
            .get(name)
            .and_then(AttributeValue::as_str)
            .unwrap_or_default()
    }

    pub(crate) fn empty() -> Self {
        Self {
            id: String::new(),
            event_type: String::new(),
            source: String::new(),
            spec_version: String::new(),
            attributes: HashMap::new(),
            data: None,
        }
    }

    pub(crate) fn insert_attribute(&mut self, name: String, value: AttributeValue) {
        self.attributes.insert(name, value);
    }

    pub(crate) fn into_parts(self) -> EventParts {
        EventParts {
            id: self.id,
            event_type: self.event_type,
            source: self.source,
            spec_version: self.spec_version,
            attributes: self.attributes,
            data: self.data,
        }
    }
}

/// The owned fields of an [`Event`], for conversions that consume it.
pub(crate) struct EventParts {
    pub id: String,
    pub event_type: String,
    pub source: String,
    pub spec_version: String,
    pub attributes: HashMap<String, AttributeValue>,
    pub data: Option<Data>,
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts absolute URIs and relative references such as
/// `type.googleapis.com/pkg.Message`.
fn is_uri_reference(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(_) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let Ok(base) = url::Url::parse("relative:///") else {
                return false;
            };
            url::Url::options()
                .base_url(Some(&base))
                .parse(value)
                .is_ok()
                && !value.chars().any(|c| c.is_whitespace() || c.is_control())
        }
        Err(_) => false,
    }
}

/// Builder for constructing events.
#[derive(Debug, Default)]
pub struct EventBuilder {
    id: Option<String>,
    event_type: Option<String>,
    source: Option<String>,
    subject: Option<String>,
    time: Option<DateTime<Utc>>,
    extensions: Vec<(String, AttributeValue)>,
    data: Option<EventData>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn extension(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.extensions.push((name.into(), value.into()));
        self
    }

    pub fn data(mut self, data: impl Into<EventData>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Builds the event. Unset identity fields keep the [`Event::new`] defaults.
    pub fn build(self) -> Event {
        let mut event = Event::new();
        if let Some(id) = self.id {
            event.set_id(id);
        }
        if let Some(event_type) = self.event_type {
            event.set_type(event_type);
        }
        if let Some(source) = self.source {
            event.set_source(source);
        }
        if let Some(subject) = self.subject {
            event.set_subject(subject);
        }
        if let Some(time) = self.time {
            event.set_time(time);
        }
        for (name, value) in self.extensions {
            event.set_extension(&name, value);
        }
        if let Some(data) = self.data {
            event.set_data(data);
        }
        event
    }
}
