//! # eventapi-proto
//!
//! Protobuf wire messages shared by every transport of the push API.
//!
//! The messages follow the CloudEvents protobuf format (field numbers included),
//! so an `Event` produced here decodes as `io.cloudevents.v1.CloudEvent`.
//! Both service namespaces (`cloud.event.v1` and `connect.event.v1`) exchange
//! the same messages; only the RPC path differs.

pub mod event {
    pub mod v1 {
        include!("gen/event.v1.rs");
    }
}

pub mod pubsub {
    pub mod v1 {
        include!("gen/pubsub.v1.rs");
    }
}
