//! Service traits of the push API and the in-process dispatcher.
//!
//! [`EventService`] is implemented on both sides of a push: by clients that
//! send events somewhere ([`crate::PubsubServiceClient`],
//! [`crate::GrpcEventServiceClient`], [`NopEventService`]) and by servers that
//! receive them ([`EventDispatcher`]). Application code implements
//! [`EventHandler`] and reads the event context from request metadata with
//! [`eventapi_events::metadata`].

use std::sync::Arc;

use async_trait::async_trait;
use eventapi_events::metadata::insert_event_metadata;
use eventapi_events::{Event, PushEventRequest};
use eventapi_proto::event::v1::PushEventResponse;
use tonic::{Request, Response, Status};
use tracing::debug;

/// Accepts pushed events.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Pushes one event.
    async fn push_event(
        &self,
        request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status>;
}

#[async_trait]
impl<S: EventService + ?Sized> EventService for Arc<S> {
    async fn push_event(
        &self,
        request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status> {
        (**self).push_event(request).await
    }
}

/// Application callback for a single event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles an event. The request metadata carries its `ce-*` context.
    async fn handle_event(&self, request: Request<Event>) -> Result<(), Status>;
}

#[async_trait]
impl<H: EventHandler + ?Sized> EventHandler for Arc<H> {
    async fn handle_event(&self, request: Request<Event>) -> Result<(), Status> {
        (**self).handle_event(request).await
    }
}

/// Acknowledges every push without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopEventService;

#[async_trait]
impl EventService for NopEventService {
    async fn push_event(
        &self,
        _request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status> {
        Ok(Response::new(PushEventResponse {}))
    }
}

/// Hands pushed events to an [`EventHandler`].
///
/// Before the handler runs, the event's context attributes are written into
/// the request metadata, replacing any `ce-*` entries already there.
#[derive(Debug, Clone)]
pub struct EventDispatcher<H> {
    handler: H,
}

impl<H: EventHandler> EventDispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<H: EventHandler> EventService for EventDispatcher<H> {
    async fn push_event(
        &self,
        request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status> {
        let (mut metadata, extensions, request) = request.into_parts();
        let event = request.into_event();

        insert_event_metadata(&mut metadata, &event);
        debug!(
            event.id = %event.id(),
            "event.type" = %event.event_type(),
            "dispatching event"
        );

        self.handler
            .handle_event(Request::from_parts(metadata, extensions, event))
            .await?;

        Ok(Response::new(PushEventResponse {}))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eventapi_events::metadata;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle_event(&self, request: Request<Event>) -> Result<(), Status> {
            let meta = request.metadata();
            let entry = (
                metadata::event_id(meta).to_string(),
                metadata::event_type(meta).to_string(),
                request.get_ref().subject().to_string(),
            );
            self.seen.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait]
    impl EventHandler for Rejecting {
        async fn handle_event(&self, _request: Request<Event>) -> Result<(), Status> {
            Err(Status::aborted("not today"))
        }
    }

    fn sample_request() -> Request<PushEventRequest> {
        let event = Event::builder()
            .id("evt-1")
            .event_type("order.created")
            .source("/orders")
            .subject("42")
            .build();
        Request::new(PushEventRequest::new(event))
    }

    #[tokio::test]
    async fn test_dispatcher_attaches_metadata() {
        let dispatcher = EventDispatcher::new(Recorder::default());
        dispatcher.push_event(sample_request()).await.unwrap();

        let seen = dispatcher.handler().seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[(
                "evt-1".to_string(),
                "order.created".to_string(),
                "42".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_dispatcher_propagates_handler_errors() {
        let dispatcher = EventDispatcher::new(Rejecting);
        let status = dispatcher.push_event(sample_request()).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Aborted);
    }

    #[tokio::test]
    async fn test_nop_service() {
        let service: Arc<dyn EventService> = Arc::new(NopEventService);
        assert!(service.push_event(sample_request()).await.is_ok());
    }
}
