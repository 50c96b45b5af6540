//! # eventapi-events
//!
//! The CloudEvents model of the push API and the codecs that move it across
//! transports.
//!
//! ## Model
//!
//! - [`Event`] holds `id`, `type`, `source` and `specversion` as fields, and
//!   every other context attribute and extension in a map of
//!   [`AttributeValue`]s
//! - The payload is one [`Data`] variant: text, opaque bytes, or a
//!   type-tagged protobuf envelope
//!
//! ## Codecs
//!
//! - Payload: [`EventData`] constructors on the way in, [`Event::data_as`]
//!   on the way out, both driven by `datacontenttype`
//! - Attribute maps: [`to_wire_attributes`] / [`from_wire_attributes`] with
//!   `ce-*` keys
//! - Envelopes: [`EnvelopeCodec`] for attribute-map transports such as Pub/Sub
//! - Metadata: [`metadata`] readers and writer for RPC request metadata
//! - Protobuf: `From`/`TryFrom` between [`Event`] and the wire `Event` message

mod attribute;
mod data;
mod envelope;
mod error;
mod event;
pub mod metadata;
mod proto;
mod registry;
mod request;
mod wire;

pub use attribute::{format_timestamp, parse_timestamp, AttributeValue};
pub use data::{content_types, Data, DataTarget, EventData, Json, Proto};
pub use envelope::{EnvelopeCodec, TransportEnvelope};
pub use error::EventError;
pub use event::{attributes, Event, EventBuilder, SPEC_VERSION};
pub use registry::{TypeRegistry, TYPE_FIELD};
pub use request::PushEventRequest;
pub use wire::{attribute_key, from_wire_attributes, to_wire_attributes, ATTRIBUTE_PREFIX};

/// Re-export of the protobuf `Any` used for structured payloads.
pub use prost_types::Any;
