//! Push requests - one event per call.

use std::collections::HashMap;

use eventapi_proto::event::v1 as pb;

use crate::error::EventError;
use crate::event::Event;
use crate::wire::to_wire_attributes;

/// The argument of a push call.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEventRequest {
    pub event: Event,
}

impl PushEventRequest {
    pub fn new(event: Event) -> Self {
        Self { event }
    }

    pub fn ordering_key(&self) -> &str {
        self.event.ordering_key()
    }

    /// The flat `ce-*` view of the event.
    pub fn attributes(&self) -> HashMap<String, String> {
        to_wire_attributes(&self.event)
    }

    pub fn into_event(self) -> Event {
        self.event
    }
}

impl From<Event> for PushEventRequest {
    fn from(event: Event) -> Self {
        Self::new(event)
    }
}

impl From<PushEventRequest> for pb::PushEventRequest {
    fn from(request: PushEventRequest) -> Self {
        pb::PushEventRequest {
            event: Some(request.event.into()),
        }
    }
}

impl TryFrom<pb::PushEventRequest> for PushEventRequest {
    type Error = EventError;

    fn try_from(request: pb::PushEventRequest) -> Result<Self, Self::Error> {
        let event = request.event.ok_or_else(|| EventError::InvalidAttribute {
            name: "event".to_string(),
            reason: "missing from push request".to_string(),
        })?;
        Ok(Self::new(Event::try_from(event)?))
    }
}
