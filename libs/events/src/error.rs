//! Error types for event encoding and decoding.

use thiserror::Error;

/// Errors that can occur when building, encoding or decoding events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The payload could not be encoded into any data representation.
    #[error("cannot set the data with data-type {data_type}: {reason}")]
    UnsupportedDataType { data_type: String, reason: String },

    /// No decoder exists for the content type and target combination.
    #[error("cannot get the data with content-type {content_type:?} as data-type {target_kind}")]
    UnsupportedContentType {
        content_type: String,
        target_kind: &'static str,
    },

    /// The stored payload variant disagrees with the declared content type.
    #[error("content-type {content_type:?} does not match {data_kind} data")]
    ContentTypeMismatch {
        content_type: String,
        data_kind: &'static str,
    },

    /// A timestamp attribute is not valid RFC 3339.
    #[error("malformed timestamp {value:?}: {reason}")]
    MalformedTimestamp { value: String, reason: String },

    /// A structured envelope could not be rendered or parsed.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A protobuf attribute value is empty or out of range.
    #[error("invalid attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: String },

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Protobuf decode error.
    #[error("decode error: {0}")]
    Decode(String),
}

impl EventError {
    /// Returns true if the error was caused by the payload codec dispatch.
    pub fn is_content_type_error(&self) -> bool {
        matches!(
            self,
            EventError::UnsupportedContentType { .. } | EventError::ContentTypeMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}

impl From<prost::DecodeError> for EventError {
    fn from(err: prost::DecodeError) -> Self {
        EventError::Decode(err.to_string())
    }
}
