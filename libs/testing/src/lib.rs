//! # eventapi-testing
//!
//! Fixtures shared by the unit and integration tests of the workspace:
//! a small protobuf message with a matching descriptor set, so structured
//! payloads can be wrapped, rendered as JSON and parsed back without a
//! protoc step.

use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use serde::{Deserialize, Serialize};

/// Package of the fixture messages.
pub const GREETING_PACKAGE: &str = "demo.v1";

/// Type URL of [`Greeting`] inside a `google.protobuf.Any`.
pub const GREETING_TYPE_URL: &str = "type.googleapis.com/demo.v1.Greeting";

/// A message that is both a protobuf message and a serde value.
#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct Greeting {
    #[prost(string, tag = "1")]
    pub message: String,
    #[prost(int32, tag = "2")]
    pub count: i32,
}

impl prost::Name for Greeting {
    const NAME: &'static str = "Greeting";
    const PACKAGE: &'static str = GREETING_PACKAGE;

    fn full_name() -> String {
        format!("{}.{}", Self::PACKAGE, Self::NAME)
    }

    fn type_url() -> String {
        GREETING_TYPE_URL.to_string()
    }
}

impl Greeting {
    pub fn new(message: impl Into<String>, count: i32) -> Self {
        Self {
            message: message.into(),
            count,
        }
    }
}

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Encoded `FileDescriptorSet` describing [`Greeting`].
pub fn greeting_descriptor_set() -> Vec<u8> {
    let file = FileDescriptorProto {
        name: Some("demo/v1/greeting.proto".to_string()),
        package: Some(GREETING_PACKAGE.to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Greeting".to_string()),
            field: vec![
                scalar_field("message", 1, Type::String),
                scalar_field("count", 2, Type::Int32),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    };

    FileDescriptorSet { file: vec![file] }.encode_to_vec()
}
