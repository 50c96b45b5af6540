//! Protobuf package namespaces the push API is published under.

use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

/// The package an `EventService` lives in.
///
/// Both namespaces share one message layout; only the fully-qualified
/// service name differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    #[default]
    Cloud,
    Connect,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Cloud => "cloud",
            Namespace::Connect => "connect",
        }
    }

    /// Protobuf package, e.g. `cloud.event.v1`.
    pub fn package(&self) -> &'static str {
        match self {
            Namespace::Cloud => "cloud.event.v1",
            Namespace::Connect => "connect.event.v1",
        }
    }

    /// Fully-qualified service name.
    pub fn service_name(&self) -> &'static str {
        match self {
            Namespace::Cloud => "cloud.event.v1.EventService",
            Namespace::Connect => "connect.event.v1.EventService",
        }
    }

    /// gRPC path of the `PushEvent` method.
    pub fn push_event_path(&self) -> &'static str {
        match self {
            Namespace::Cloud => "/cloud.event.v1.EventService/PushEvent",
            Namespace::Connect => "/connect.event.v1.EventService/PushEvent",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud" | "cloud.event.v1" => Ok(Namespace::Cloud),
            "connect" | "connect.event.v1" => Ok(Namespace::Connect),
            _ => Err(SdkError::UnknownNamespace(s.to_string())),
        }
    }
}
