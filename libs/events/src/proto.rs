//! Conversions to and from the protobuf wire messages.

use eventapi_proto::event::v1 as pb;
use pb::event::Data as PbData;
use pb::event_attribute_value::Attr;

use crate::attribute::{timestamp_from_proto, timestamp_to_proto, AttributeValue};
use crate::data::Data;
use crate::error::EventError;
use crate::event::{Event, EventParts};

impl From<AttributeValue> for pb::EventAttributeValue {
    fn from(value: AttributeValue) -> Self {
        let attr = match value {
            AttributeValue::Boolean(v) => Attr::CeBoolean(v),
            AttributeValue::Integer(v) => Attr::CeInteger(v),
            AttributeValue::Bytes(v) => Attr::CeBytes(v),
            AttributeValue::String(v) => Attr::CeString(v),
            AttributeValue::Uri(v) => Attr::CeUri(v),
            AttributeValue::UriRef(v) => Attr::CeUriRef(v),
            AttributeValue::Timestamp(v) => Attr::CeTimestamp(timestamp_to_proto(&v)),
        };
        pb::EventAttributeValue { attr: Some(attr) }
    }
}

fn attribute_from_proto(
    name: &str,
    value: pb::EventAttributeValue,
) -> Result<AttributeValue, EventError> {
    let invalid = |reason: String| EventError::InvalidAttribute {
        name: name.to_string(),
        reason,
    };

    Ok(match value.attr.ok_or_else(|| invalid("empty value".to_string()))? {
        Attr::CeBoolean(v) => AttributeValue::Boolean(v),
        Attr::CeInteger(v) => AttributeValue::Integer(v),
        Attr::CeBytes(v) => AttributeValue::Bytes(v),
        Attr::CeString(v) => AttributeValue::String(v),
        Attr::CeUri(v) => AttributeValue::Uri(v),
        Attr::CeUriRef(v) => AttributeValue::UriRef(v),
        Attr::CeTimestamp(v) => {
            AttributeValue::Timestamp(timestamp_from_proto(&v).map_err(|e| invalid(e.to_string()))?)
        }
    })
}

impl From<Event> for pb::Event {
    fn from(event: Event) -> Self {
        let EventParts {
            id,
            event_type,
            source,
            spec_version,
            attributes,
            data,
        } = event.into_parts();

        pb::Event {
            id,
            source,
            spec_version,
            r#type: event_type,
            attributes: attributes
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
            data: data.map(|data| match data {
                Data::Text(text) => PbData::TextData(text),
                Data::Binary(bytes) => PbData::BinaryData(bytes),
                Data::Structured(any) => PbData::ProtoData(any),
            }),
        }
    }
}

impl TryFrom<pb::Event> for Event {
    type Error = EventError;

    fn try_from(value: pb::Event) -> Result<Self, Self::Error> {
        let mut event = Event::empty();
        event.set_id(value.id);
        event.set_source(value.source);
        event.set_spec_version(value.spec_version);
        event.set_type(value.r#type);

        for (name, attribute) in value.attributes {
            let attribute = attribute_from_proto(&name, attribute)?;
            event.insert_attribute(name.to_ascii_lowercase(), attribute);
        }

        event.replace_data(value.data.map(|data| match data {
            PbData::TextData(text) => Data::Text(text),
            PbData::BinaryData(bytes) => Data::Binary(bytes),
            PbData::ProtoData(any) => Data::Structured(any),
        }));

        Ok(event)
    }
}
