//! Pub/Sub adapters.
//!
//! - [`PubsubServiceClient`] flattens pushed events into Pub/Sub messages and
//!   publishes them, ordered by event id
//! - [`PubsubPushService`] receives push-subscription deliveries, rebuilds the
//!   event and forwards it to an [`EventService`]
//!
//! The broker itself sits behind [`Publisher`]. [`ChannelPublisher`] is an
//! in-process implementation backed by a tokio channel.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use eventapi_events::metadata::insert_event_metadata;
use eventapi_events::{EnvelopeCodec, PushEventRequest, TransportEnvelope};
use eventapi_proto::event::v1::PushEventResponse;
use eventapi_proto::pubsub::v1::{
    PubsubMessage, PushPubsubMessageRequest, PushPubsubMessageResponse,
};
use tokio::sync::mpsc;
use tonic::{Request, Response, Status};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::PubsubServiceClientConfig;
use crate::error::SdkError;
use crate::service::EventService;

/// A message broker topic sink.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes a message to `topic` (a fully-qualified topic name) and
    /// waits for the broker's acknowledgement. Returns the message id.
    async fn publish(&self, topic: &str, message: PubsubMessage) -> Result<String, SdkError>;
}

#[async_trait]
impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    async fn publish(&self, topic: &str, message: PubsubMessage) -> Result<String, SdkError> {
        (**self).publish(topic, message).await
    }
}

/// A message handed to a [`ChannelPublisher`].
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub topic: String,
    pub message: PubsubMessage,
}

/// In-process publisher. Messages come out of the paired receiver in
/// publish order, stamped with an id and publish time.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<PublishedMessage>,
}

impl ChannelPublisher {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PublishedMessage>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Publisher for ChannelPublisher {
    async fn publish(&self, topic: &str, mut message: PubsubMessage) -> Result<String, SdkError> {
        let message_id = Uuid::now_v7().to_string();
        let now = Utc::now();
        message.message_id = message_id.clone();
        message.publish_time = Some(prost_types::Timestamp {
            seconds: now.timestamp(),
            nanos: now.timestamp_subsec_nanos() as i32,
        });

        self.sender
            .send(PublishedMessage {
                topic: topic.to_string(),
                message,
            })
            .await
            .map_err(|_| SdkError::Publish("subscriber channel closed".to_string()))?;

        Ok(message_id)
    }
}

/// Publishes pushed events to a Pub/Sub topic.
#[derive(Debug, Clone)]
pub struct PubsubServiceClient<P> {
    publisher: P,
    codec: EnvelopeCodec,
    topic: String,
}

impl<P: Publisher> PubsubServiceClient<P> {
    /// Fails with [`SdkError::MissingConfiguration`] when the project or the
    /// topic is empty.
    pub fn new(
        config: &PubsubServiceClientConfig,
        publisher: P,
        codec: EnvelopeCodec,
    ) -> Result<Self, SdkError> {
        config.validate()?;
        Ok(Self {
            publisher,
            codec,
            topic: config.topic_path(),
        })
    }

    /// Fully-qualified name of the topic events go to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl<P: Publisher> EventService for PubsubServiceClient<P> {
    async fn push_event(
        &self,
        request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status> {
        let event = request.into_inner().into_event();

        let TransportEnvelope {
            data,
            attributes,
            ordering_key,
        } = self.codec.encode(&event).map_err(|e| {
            error!(event.id = %event.id(), error = %e, "failed to encode event");
            Status::internal(e.to_string())
        })?;

        info!(
            event.id = %event.id(),
            "event.type" = %event.event_type(),
            event.source = %event.source(),
            event.subject = %event.subject(),
            topic = %self.topic,
            "push an event"
        );

        let message = PubsubMessage {
            data,
            attributes,
            ordering_key,
            ..Default::default()
        };

        let message_id = self
            .publisher
            .publish(&self.topic, message)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        debug!(event.id = %event.id(), message_id = %message_id, "event published");

        Ok(Response::new(PushEventResponse {}))
    }
}

/// Receives Pub/Sub push deliveries and forwards them as events.
#[derive(Debug, Clone)]
pub struct PubsubPushService<S> {
    service: S,
    codec: EnvelopeCodec,
}

impl<S: EventService> PubsubPushService<S> {
    pub fn new(service: S, codec: EnvelopeCodec) -> Self {
        Self { service, codec }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Decodes the delivered message and pushes the event downstream. The
    /// event's context attributes are written into the request metadata as
    /// `ce-*` entries; other metadata is passed through.
    ///
    /// Malformed messages fail with `InvalidArgument`; downstream errors are
    /// returned as-is.
    pub async fn push_pubsub_message(
        &self,
        request: Request<PushPubsubMessageRequest>,
    ) -> Result<Response<PushPubsubMessageResponse>, Status> {
        let (mut metadata, extensions, request) = request.into_parts();
        let message = request
            .message
            .ok_or_else(|| Status::invalid_argument("missing pubsub message"))?;

        debug!(
            subscription = %request.subscription,
            message_id = %message.message_id,
            "received pubsub message"
        );

        let event = self
            .codec
            .decode(TransportEnvelope {
                data: message.data,
                attributes: message.attributes,
                ordering_key: message.ordering_key,
            })
            .map_err(SdkError::from)?;

        insert_event_metadata(&mut metadata, &event);
        self.service
            .push_event(Request::from_parts(
                metadata,
                extensions,
                PushEventRequest::new(event),
            ))
            .await?;

        Ok(Response::new(PushPubsubMessageResponse {}))
    }
}
