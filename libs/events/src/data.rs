//! Payload codec - content-type driven encoding of event data.
//!
//! Producers pick an [`EventData`] constructor for the kind of value they hold;
//! [`Event::set_data`] stores the payload and records `datacontenttype` (and
//! `dataschema` for protobuf messages). Consumers read the payload back with
//! [`Event::data_as`], which dispatches on the content type rather than on how
//! the payload was produced.

use prost::Name;
use prost_types::Any;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::EventError;
use crate::event::Event;

/// Content types understood by the payload codec.
pub mod content_types {
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const JSON: &str = "application/json";
    pub const PROTOBUF: &str = "application/cloudevents+protobuf";
}

/// The stored payload. At most one representation is held at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Text(String),
    Binary(Vec<u8>),
    /// A type-tagged protobuf envelope.
    Structured(Any),
}

impl Data {
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Text(_) => "text",
            Data::Binary(_) => "binary",
            Data::Structured(_) => "structured",
        }
    }
}

/// An encoded payload ready to be attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    data: Data,
    content_type: &'static str,
    schema: Option<String>,
}

impl EventData {
    /// Plain text, `text/plain`.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            data: Data::Text(value.into()),
            content_type: content_types::TEXT_PLAIN,
            schema: None,
        }
    }

    /// Opaque bytes, `application/octet-stream`.
    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Data::Binary(value.into()),
            content_type: content_types::OCTET_STREAM,
            schema: None,
        }
    }

    /// A serde value marshalled to JSON bytes, `application/json`.
    pub fn json<T>(value: &T) -> Result<Self, EventError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(value).map_err(|e| EventError::UnsupportedDataType {
            data_type: std::any::type_name::<T>().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            data: Data::Binary(payload),
            content_type: content_types::JSON,
            schema: None,
        })
    }

    /// A protobuf message carried as JSON; the type URL becomes the data schema.
    pub fn json_message<M>(value: &M) -> Result<Self, EventError>
    where
        M: Serialize + Name,
    {
        let mut data = Self::json(value)?;
        data.schema = Some(M::type_url());
        Ok(data)
    }

    /// A protobuf message wrapped in an `Any`, `application/cloudevents+protobuf`.
    pub fn message<M>(value: &M) -> Result<Self, EventError>
    where
        M: Name,
    {
        let any = Any::from_msg(value).map_err(|e| EventError::UnsupportedDataType {
            data_type: std::any::type_name::<M>().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::any(any))
    }

    /// An already wrapped message.
    pub fn any(value: Any) -> Self {
        let schema = value.type_url.clone();
        Self {
            data: Data::Structured(value),
            content_type: content_types::PROTOBUF,
            schema: Some(schema),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl From<String> for EventData {
    fn from(value: String) -> Self {
        EventData::text(value)
    }
}

impl From<&str> for EventData {
    fn from(value: &str) -> Self {
        EventData::text(value)
    }
}

impl From<Vec<u8>> for EventData {
    fn from(value: Vec<u8>) -> Self {
        EventData::binary(value)
    }
}

impl From<&[u8]> for EventData {
    fn from(value: &[u8]) -> Self {
        EventData::binary(value)
    }
}

impl From<bytes::Bytes> for EventData {
    fn from(value: bytes::Bytes) -> Self {
        EventData::binary(value)
    }
}

impl From<Any> for EventData {
    fn from(value: Any) -> Self {
        EventData::any(value)
    }
}

/// A value that event data can be decoded into.
///
/// Each method is one capability; the default `None` means the target cannot
/// be populated from that representation.
pub trait DataTarget: Sized {
    /// Name of the target used in error messages.
    fn kind() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn from_text(_text: &str) -> Option<Self> {
        None
    }

    fn from_bytes(_bytes: &[u8]) -> Option<Self> {
        None
    }

    fn from_json(_bytes: &[u8]) -> Option<Result<Self, EventError>> {
        None
    }

    fn from_message(_any: &Any) -> Option<Result<Self, EventError>> {
        None
    }
}

impl DataTarget for String {
    fn from_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl DataTarget for Vec<u8> {
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

impl DataTarget for Any {
    fn from_message(any: &Any) -> Option<Result<Self, EventError>> {
        Some(Ok(any.clone()))
    }
}

/// Decodes `application/json` data into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> DataTarget for Json<T> {
    fn kind() -> &'static str {
        std::any::type_name::<T>()
    }

    fn from_json(bytes: &[u8]) -> Option<Result<Self, EventError>> {
        Some(serde_json::from_slice(bytes).map(Json).map_err(Into::into))
    }
}

/// Unwraps `application/cloudevents+protobuf` data into the message `M`.
#[derive(Debug, Clone, PartialEq)]
pub struct Proto<M>(pub M);

impl<M> Proto<M> {
    pub fn into_inner(self) -> M {
        self.0
    }
}

impl<M: Name + Default> DataTarget for Proto<M> {
    fn kind() -> &'static str {
        std::any::type_name::<M>()
    }

    fn from_message(any: &Any) -> Option<Result<Self, EventError>> {
        Some(any.to_msg::<M>().map(Proto).map_err(Into::into))
    }
}

impl Event {
    /// Replaces the payload and records its content type and schema.
    ///
    /// Any schema left by a previous payload is cleared first, so a payload
    /// without a schema (or with one that is not a URI reference) leaves
    /// `dataschema` unset.
    pub fn set_data(&mut self, data: impl Into<EventData>) {
        let EventData {
            data,
            content_type,
            schema,
        } = data.into();

        self.set_data_content_type(content_type);
        self.remove_extension(crate::event::attributes::DATA_SCHEMA);
        if let Some(schema) = schema {
            self.set_data_schema(schema);
        }
        self.replace_data(Some(data));
    }

    /// Decodes the payload according to the current `datacontenttype`.
    pub fn data_as<T: DataTarget>(&self) -> Result<T, EventError> {
        let content_type = self.data_content_type();
        let unsupported = || EventError::UnsupportedContentType {
            content_type: content_type.to_string(),
            target_kind: T::kind(),
        };
        let mismatch = |data: &Data| EventError::ContentTypeMismatch {
            content_type: content_type.to_string(),
            data_kind: data.kind(),
        };

        if content_type.starts_with("text") {
            let text = match self.data() {
                Some(Data::Text(text)) => text.as_str(),
                None => "",
                Some(other) => return Err(mismatch(other)),
            };
            return T::from_text(text).ok_or_else(unsupported);
        }

        if content_type.eq_ignore_ascii_case(content_types::JSON) {
            let bytes: &[u8] = match self.data() {
                Some(Data::Binary(bytes)) => bytes.as_slice(),
                Some(Data::Text(text)) => text.as_bytes(),
                None => &[],
                Some(other) => return Err(mismatch(other)),
            };
            return T::from_json(bytes).ok_or_else(unsupported)?;
        }

        if content_type.eq_ignore_ascii_case(content_types::PROTOBUF) {
            let any = match self.data() {
                Some(Data::Structured(any)) => any,
                Some(other) => return Err(mismatch(other)),
                None => return Err(unsupported()),
            };
            return T::from_message(any).ok_or_else(unsupported)?;
        }

        if content_type.eq_ignore_ascii_case(content_types::OCTET_STREAM) {
            let bytes: &[u8] = match self.data() {
                Some(Data::Binary(bytes)) => bytes.as_slice(),
                None => &[],
                Some(other) => return Err(mismatch(other)),
            };
            return T::from_bytes(bytes).ok_or_else(unsupported);
        }

        Err(unsupported())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eventapi_testing::{Greeting, GREETING_TYPE_URL};
    use prost::Message;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        a: i32,
    }

    #[test]
    fn test_text_round_trip() {
        let mut event = Event::new();
        event.set_data("hello");
        assert_eq!(event.data_content_type(), "text/plain");
        assert_eq!(event.data(), Some(&Data::Text("hello".into())));
        assert_eq!(event.data_as::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_binary_round_trip() {
        let mut event = Event::new();
        event.set_data(vec![0u8, 1, 2, 255]);
        assert_eq!(event.data_content_type(), "application/octet-stream");
        assert_eq!(event.data_as::<Vec<u8>>().unwrap(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut event = Event::new();
        event.set_data(EventData::json(&Payload { a: 1 }).unwrap());
        assert_eq!(event.data_content_type(), "application/json");
        assert_eq!(event.data(), Some(&Data::Binary(br#"{"a":1}"#.to_vec())));
        assert_eq!(event.data_schema(), "");

        let Json(payload) = event.data_as::<Json<Payload>>().unwrap();
        assert_eq!(payload, Payload { a: 1 });
    }

    #[test]
    fn test_json_content_type_is_case_insensitive() {
        let mut event = Event::new();
        event.set_data(br#"{"a":1}"#.as_slice());
        event.set_data_content_type("Application/JSON");
        let payload = event.data_as::<Json<Payload>>().unwrap().into_inner();
        assert_eq!(payload.a, 1);
    }

    #[test]
    fn test_json_message_records_schema() {
        let mut event = Event::new();
        event.set_data(EventData::json_message(&Greeting::new("hi", 2)).unwrap());
        assert_eq!(event.data_content_type(), "application/json");
        assert_eq!(event.data_schema(), GREETING_TYPE_URL);

        let greeting = event.data_as::<Json<Greeting>>().unwrap().into_inner();
        assert_eq!(greeting, Greeting::new("hi", 2));
    }

    #[test]
    fn test_message_round_trip() {
        let greeting = Greeting::new("hello", 3);
        let mut event = Event::new();
        event.set_data(EventData::message(&greeting).unwrap());

        assert_eq!(event.data_content_type(), "application/cloudevents+protobuf");
        assert_eq!(event.data_schema(), GREETING_TYPE_URL);
        match event.data() {
            Some(Data::Structured(any)) => {
                assert_eq!(any.type_url, GREETING_TYPE_URL);
                assert_eq!(any.value, greeting.encode_to_vec());
            }
            other => panic!("unexpected data: {other:?}"),
        }

        let Proto(decoded) = event.data_as::<Proto<Greeting>>().unwrap();
        assert_eq!(decoded, greeting);
        assert_eq!(event.data_as::<Any>().unwrap().type_url, GREETING_TYPE_URL);
    }

    #[test]
    fn test_unencodable_value_leaves_event_untouched() {
        let mut value = HashMap::new();
        value.insert((1, 2), 3);

        let mut event = Event::new();
        event.set_data("keep");
        let before = event.clone();

        let err = EventData::json(&value).unwrap_err();
        assert!(matches!(err, EventError::UnsupportedDataType { .. }));
        assert_eq!(event, before);
    }

    #[test]
    fn test_text_with_non_string_target_is_unsupported() {
        let mut event = Event::new();
        event.set_data("hello");
        let err = event.data_as::<Json<Payload>>().unwrap_err();
        assert!(matches!(
            err,
            EventError::UnsupportedContentType { ref content_type, .. } if content_type == "text/plain"
        ));
    }

    #[test]
    fn test_binary_under_text_content_type_is_rejected() {
        let mut event = Event::new();
        event.set_data(vec![0xffu8, 0xfe]);
        event.set_data_content_type("text/plain");
        let err = event.data_as::<String>().unwrap_err();
        assert_eq!(
            err,
            EventError::ContentTypeMismatch {
                content_type: "text/plain".into(),
                data_kind: "binary",
            }
        );
    }

    #[test]
    fn test_unknown_content_type_is_unsupported() {
        let mut event = Event::new();
        event.set_data(b"<a/>".as_slice());
        event.set_data_content_type("application/xml");
        let err = event.data_as::<Vec<u8>>().unwrap_err();
        assert!(err.is_content_type_error());
    }

    #[test]
    fn test_new_payload_replaces_previous() {
        let mut event = Event::new();
        event.set_data(EventData::message(&Greeting::new("x", 1)).unwrap());
        event.set_data("plain");

        assert_eq!(event.data(), Some(&Data::Text("plain".into())));
        assert_eq!(event.data_content_type(), "text/plain");
        assert_eq!(event.data_schema(), "");
    }

    #[test]
    fn test_invalid_schema_does_not_keep_previous_schema() {
        let mut event = Event::new();
        event.set_data(EventData::message(&Greeting::new("x", 1)).unwrap());
        assert_eq!(event.data_schema(), GREETING_TYPE_URL);

        event.set_data(EventData::any(Any {
            type_url: "type.googleapis.com/demo v1.Broken".into(),
            value: vec![],
        }));
        assert_eq!(event.data_schema(), "");
        assert!(event.extension("dataschema").is_none());
    }

    #[test]
    fn test_event_data_reports_content_type_and_schema() {
        let text = EventData::text("hi");
        assert_eq!(text.content_type(), content_types::TEXT_PLAIN);
        assert_eq!(text.schema(), None);

        let binary = EventData::from(bytes::Bytes::from_static(b"\x00\x01"));
        assert_eq!(binary.content_type(), content_types::OCTET_STREAM);
        assert_eq!(binary.schema(), None);

        let json = EventData::json_message(&Greeting::new("hi", 1)).unwrap();
        assert_eq!(json.content_type(), content_types::JSON);
        assert_eq!(json.schema(), Some(GREETING_TYPE_URL));

        let message = EventData::message(&Greeting::new("hi", 1)).unwrap();
        assert_eq!(message.content_type(), content_types::PROTOBUF);
        assert_eq!(message.schema(), Some(GREETING_TYPE_URL));
    }

    #[test]
    fn test_wrong_message_type_fails_to_unwrap() {
        let mut event = Event::new();
        event.set_data(EventData::any(Any {
            type_url: "type.googleapis.com/demo.v1.Other".into(),
            value: vec![],
        }));
        let err = event.data_as::<Proto<Greeting>>().unwrap_err();
        assert!(matches!(err, EventError::Decode(_)));
    }
}
