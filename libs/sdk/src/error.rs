//! Error types for the transport adapters.

use eventapi_events::EventError;
use tonic::{Code, Status};

/// Errors raised by the SDK adapters.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// A required configuration value is empty.
    #[error("no {0}")]
    MissingConfiguration(&'static str),

    /// Namespace name not recognized.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// The event could not be encoded or decoded.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The broker rejected or never acknowledged a message.
    #[error("publish failed: {0}")]
    Publish(String),

    /// The RPC channel could not be established.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SdkError {
    /// Returns true if this error is caused by bad configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SdkError::MissingConfiguration(_) | SdkError::UnknownNamespace(_)
        )
    }
}

impl From<tonic::transport::Error> for SdkError {
    fn from(err: tonic::transport::Error) -> Self {
        SdkError::Transport(err.to_string())
    }
}

impl From<SdkError> for Status {
    fn from(err: SdkError) -> Self {
        let code = match &err {
            SdkError::MissingConfiguration(_) => Code::FailedPrecondition,
            SdkError::UnknownNamespace(_) | SdkError::Event(_) => Code::InvalidArgument,
            SdkError::Publish(_) => Code::Internal,
            SdkError::Transport(_) => Code::Unavailable,
        };
        Status::new(code, err.to_string())
    }
}
