//! Message type registry used to render structured payloads as JSON.
//!
//! A `google.protobuf.Any` only carries a type URL and opaque bytes. To put it
//! on a flat-byte transport in its self-describing JSON form the message
//! descriptor has to be known, so the registry wraps a prost-reflect
//! [`DescriptorPool`] built once at startup and shared read-only.

use prost_reflect::prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor};
use prost_types::Any;
use serde_json::{Map, Value};

use crate::error::EventError;

/// JSON member holding the type URL of a rendered `Any`.
pub const TYPE_FIELD: &str = "@type";

/// JSON member holding the body of well-known types inside a rendered `Any`.
const VALUE_FIELD: &str = "value";

const WELL_KNOWN_PACKAGE: &str = "google.protobuf.";

/// Resolves type URLs to message descriptors.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    pool: DescriptorPool,
}

impl TypeRegistry {
    pub fn new(pool: DescriptorPool) -> Self {
        Self { pool }
    }

    /// A registry that resolves nothing.
    pub fn empty() -> Self {
        Self::new(DescriptorPool::new())
    }

    /// Builds a registry from an encoded `FileDescriptorSet`.
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self, EventError> {
        DescriptorPool::decode(bytes)
            .map(Self::new)
            .map_err(|e| EventError::Decode(e.to_string()))
    }

    /// Adds the files of an encoded `FileDescriptorSet`.
    pub fn register_file_descriptor_set(&mut self, bytes: &[u8]) -> Result<(), EventError> {
        self.pool
            .decode_file_descriptor_set(bytes)
            .map_err(|e| EventError::Decode(e.to_string()))
    }

    /// Looks up the descriptor named by the last segment of a type URL.
    pub fn resolve(&self, type_url: &str) -> Option<MessageDescriptor> {
        let name = type_url.rsplit('/').next()?;
        self.pool.get_message_by_name(name)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.resolve(type_url).is_some()
    }

    /// Renders an `Any` as `{"@type": url, ...fields}`.
    pub fn to_json(&self, any: &Any) -> Result<Value, EventError> {
        let descriptor = self.resolve_or_err(&any.type_url)?;
        let message = DynamicMessage::decode(descriptor.clone(), any.value.as_slice())
            .map_err(|e| EventError::MalformedEnvelope(e.to_string()))?;
        let body = serde_json::to_value(&message)
            .map_err(|e| EventError::MalformedEnvelope(e.to_string()))?;

        let mut object = Map::new();
        object.insert(TYPE_FIELD.to_string(), Value::String(any.type_url.clone()));
        match body {
            Value::Object(fields) if !is_well_known(&descriptor) => object.extend(fields),
            other => {
                object.insert(VALUE_FIELD.to_string(), other);
            }
        }

        Ok(Value::Object(object))
    }

    /// Parses the JSON form produced by [`TypeRegistry::to_json`].
    pub fn from_json(&self, value: Value) -> Result<Any, EventError> {
        let Value::Object(mut fields) = value else {
            return Err(EventError::MalformedEnvelope(
                "expected a JSON object".to_string(),
            ));
        };

        let type_url = match fields.remove(TYPE_FIELD) {
            Some(Value::String(type_url)) => type_url,
            _ => {
                return Err(EventError::MalformedEnvelope(format!(
                    "missing {TYPE_FIELD} member"
                )))
            }
        };

        let descriptor = self.resolve_or_err(&type_url)?;
        let body = if is_well_known(&descriptor) {
            fields.remove(VALUE_FIELD).unwrap_or(Value::Null)
        } else {
            Value::Object(fields)
        };

        let message = DynamicMessage::deserialize(descriptor, body)
            .map_err(|e| EventError::MalformedEnvelope(e.to_string()))?;

        Ok(Any {
            type_url,
            value: message.encode_to_vec(),
        })
    }

    fn resolve_or_err(&self, type_url: &str) -> Result<MessageDescriptor, EventError> {
        self.resolve(type_url).ok_or_else(|| {
            EventError::MalformedEnvelope(format!("unknown message type {type_url:?}"))
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

fn is_well_known(descriptor: &MessageDescriptor) -> bool {
    descriptor.full_name().starts_with(WELL_KNOWN_PACKAGE)
}

#[cfg(test)]
mod tests {
    use eventapi_testing::{greeting_descriptor_set, Greeting, GREETING_TYPE_URL};
    use serde_json::json;

    use super::*;

    fn registry() -> TypeRegistry {
        TypeRegistry::from_file_descriptor_set(&greeting_descriptor_set()).unwrap()
    }

    #[test]
    fn test_resolve_by_type_url() {
        let registry = registry();
        assert!(registry.contains(GREETING_TYPE_URL));
        assert!(registry.contains("demo.v1.Greeting"));
        assert!(!registry.contains("type.googleapis.com/demo.v1.Missing"));
        assert!(!TypeRegistry::empty().contains(GREETING_TYPE_URL));
    }

    #[test]
    fn test_any_json_round_trip() {
        let registry = registry();
        let any = Any::from_msg(&Greeting::new("hi", 2)).unwrap();

        let rendered = registry.to_json(&any).unwrap();
        assert_eq!(
            rendered,
            json!({"@type": GREETING_TYPE_URL, "message": "hi", "count": 2})
        );

        let parsed = registry.from_json(rendered).unwrap();
        assert_eq!(parsed, any);
    }

    #[test]
    fn test_from_json_requires_type() {
        let err = registry()
            .from_json(json!({"message": "hi"}))
            .unwrap_err();
        assert!(matches!(err, EventError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = registry()
            .from_json(json!({"@type": "type.googleapis.com/demo.v1.Missing"}))
            .unwrap_err();
        assert!(matches!(err, EventError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = registry().from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, EventError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_register_descriptor_set_into_empty_registry() {
        let mut registry = TypeRegistry::empty();
        registry
            .register_file_descriptor_set(&greeting_descriptor_set())
            .unwrap();
        assert!(registry.contains(GREETING_TYPE_URL));

        let any = Any::from_msg(&Greeting::new("late", 1)).unwrap();
        assert_eq!(
            registry.to_json(&any).unwrap(),
            json!({"@type": GREETING_TYPE_URL, "message": "late", "count": 1})
        );

        let err = registry
            .register_file_descriptor_set(b"\xff\xff")
            .unwrap_err();
        assert!(matches!(err, EventError::Decode(_)));
        assert!(registry.contains(GREETING_TYPE_URL));
    }

    #[test]
    fn test_bad_descriptor_set() {
        let err = TypeRegistry::from_file_descriptor_set(b"\xff\xff").unwrap_err();
        assert!(matches!(err, EventError::Decode(_)));
    }
}
