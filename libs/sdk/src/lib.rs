//! # eventapi-sdk
//!
//! Transport adapters for the CloudEvents push API.
//!
//! - [`EventService`] / [`EventHandler`]: the push contract and the
//!   application callback behind it
//! - [`EventDispatcher`]: server side, exposes the event context as `ce-*`
//!   request metadata before calling the handler
//! - [`PubsubServiceClient`] / [`PubsubPushService`]: publish events to a
//!   Pub/Sub topic and receive them from a push subscription
//! - [`GrpcEventServiceClient`]: push to a remote service over gRPC
//! - [`NopEventService`]: acknowledges everything

pub mod config;
mod error;
mod grpc;
mod namespace;
mod pubsub;
mod service;
pub mod telemetry;

pub use config::{GrpcClientConfig, PubsubServiceClientConfig};
pub use error::SdkError;
pub use grpc::GrpcEventServiceClient;
pub use namespace::Namespace;
pub use pubsub::{
    ChannelPublisher, PublishedMessage, Publisher, PubsubPushService, PubsubServiceClient,
};
pub use service::{EventDispatcher, EventHandler, EventService, NopEventService};

pub use eventapi_proto::event::v1::PushEventResponse;
