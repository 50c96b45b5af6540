/// A CloudEvent in its structured-binary form.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub source: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub spec_version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub r#type: ::prost::alloc::string::String,
    /// Optional and extension attributes, keyed by lowercase name.
    #[prost(map = "string, message", tag = "5")]
    pub attributes:
        ::std::collections::HashMap<::prost::alloc::string::String, EventAttributeValue>,
    #[prost(oneof = "event::Data", tags = "6, 7, 8")]
    pub data: ::core::option::Option<event::Data>,
}

/// Nested message and enum types in `Event`.
pub mod event {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(bytes, tag = "6")]
        BinaryData(::prost::alloc::vec::Vec<u8>),
        #[prost(string, tag = "7")]
        TextData(::prost::alloc::string::String),
        #[prost(message, tag = "8")]
        ProtoData(::prost_types::Any),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventAttributeValue {
    #[prost(oneof = "event_attribute_value::Attr", tags = "1, 2, 3, 4, 5, 6, 7")]
    pub attr: ::core::option::Option<event_attribute_value::Attr>,
}

/// Nested message and enum types in `EventAttributeValue`.
pub mod event_attribute_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Attr {
        #[prost(bool, tag = "1")]
        CeBoolean(bool),
        #[prost(int32, tag = "2")]
        CeInteger(i32),
        #[prost(string, tag = "3")]
        CeString(::prost::alloc::string::String),
        #[prost(bytes, tag = "4")]
        CeBytes(::prost::alloc::vec::Vec<u8>),
        #[prost(string, tag = "5")]
        CeUri(::prost::alloc::string::String),
        #[prost(string, tag = "6")]
        CeUriRef(::prost::alloc::string::String),
        #[prost(message, tag = "7")]
        CeTimestamp(::prost_types::Timestamp),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PushEventRequest {
    #[prost(message, optional, tag = "1")]
    pub event: ::core::option::Option<Event>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PushEventResponse {}
