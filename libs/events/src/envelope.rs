//! Transport envelope - the flat form used by attribute-map transports.
//!
//! An envelope is a byte payload, a `ce-*` attribute map and an ordering key,
//! which is exactly what a Pub/Sub message carries. Structured payloads are
//! rendered through their JSON form so the bytes stay self-describing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::{content_types, Data};
use crate::error::EventError;
use crate::event::Event;
use crate::registry::TypeRegistry;
use crate::wire::{from_wire_attributes, to_wire_attributes};

/// A flattened event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportEnvelope {
    pub data: Vec<u8>,
    pub attributes: HashMap<String, String>,
    pub ordering_key: String,
}

/// Converts events to and from [`TransportEnvelope`]s.
///
/// Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    registry: Arc<TypeRegistry>,
}

impl EnvelopeCodec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Flattens an event.
    pub fn encode(&self, event: &Event) -> Result<TransportEnvelope, EventError> {
        Ok(TransportEnvelope {
            data: self.encode_payload(event)?,
            attributes: to_wire_attributes(event),
            ordering_key: event.ordering_key().to_string(),
        })
    }

    /// Rebuilds an event. The payload is interpreted with the
    /// `ce-datacontenttype` carried in the attributes.
    pub fn decode(&self, envelope: TransportEnvelope) -> Result<Event, EventError> {
        let mut event = from_wire_attributes(envelope.attributes)?;
        let data = self.decode_payload(envelope.data, event.data_content_type())?;

        if let Some(Data::Structured(any)) = &data {
            if event.data_schema().is_empty() {
                let schema = any.type_url.clone();
                event.set_data_schema(schema);
            }
        }
        event.replace_data(data);

        Ok(event)
    }

    /// Payload bytes for the event's current data.
    pub fn encode_payload(&self, event: &Event) -> Result<Vec<u8>, EventError> {
        match event.data() {
            Some(Data::Structured(any)) => {
                let value = self.registry.to_json(any)?;
                serde_json::to_vec(&value).map_err(|e| EventError::MalformedEnvelope(e.to_string()))
            }
            Some(Data::Text(text)) => Ok(text.as_bytes().to_vec()),
            Some(Data::Binary(bytes)) => Ok(bytes.clone()),
            None => Ok(Vec::new()),
        }
    }

    /// Interprets payload bytes according to a content type.
    ///
    /// Without a content type an empty payload means no data. With one, an
    /// empty payload is still data of that type: empty text or empty bytes,
    /// while an empty structured payload is malformed.
    pub fn decode_payload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<Data>, EventError> {
        if content_type.is_empty() && bytes.is_empty() {
            return Ok(None);
        }

        if content_type.eq_ignore_ascii_case(content_types::PROTOBUF) {
            let value: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| EventError::MalformedEnvelope(e.to_string()))?;
            return self.registry.from_json(value).map(|any| Some(Data::Structured(any)));
        }

        if content_type.starts_with("text") {
            return String::from_utf8(bytes)
                .map(|text| Some(Data::Text(text)))
                .map_err(|e| EventError::MalformedEnvelope(e.to_string()));
        }

        Ok(Some(Data::Binary(bytes)))
    }
}
