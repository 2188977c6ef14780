//! Field table: which codec handles which field.
//!
//! Every field of [`Envelope`] and [`Notification`] has one [`FieldSpec`]
//! row naming its wire key, its [`FieldCodec`] and whether it may be absent.
//! Decode and encode walk these tables; an irregular field is supported by
//! giving it a codec here, not by changing the control flow in
//! [`codec`](super).

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::{placeholder, timestamp};
use crate::error::{DecodeError, EncodeError};
use crate::types::{AttributePlaceholder, EpochUnit, Notification, Timestamp};

/// Encode/decode behaviour attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    /// Pass-through JSON string.
    Text,
    /// Pass-through JSON integer.
    Integer,
    /// Pass-through JSON number.
    Float,
    /// RFC3339 string in, epoch number out.
    Timestamp,
    /// Any object in, `{}` out.
    Placeholder,
    /// Nested [`Notification`] object.
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing is a schema mismatch.
    Required,
    /// Missing or `null` falls back to the field's empty value.
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical wire key, always used on encode.
    pub name: &'static str,
    pub codec: FieldCodec,
    pub presence: Presence,
}

impl FieldSpec {
    const fn required(name: &'static str, codec: FieldCodec) -> Self {
        Self { name, codec, presence: Presence::Required }
    }

    const fn defaulted(name: &'static str, codec: FieldCodec) -> Self {
        Self { name, codec, presence: Presence::Defaulted }
    }
}

// Rows are kept in key order so encoded objects come out sorted.

pub const ENVELOPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::defaulted("eventSource", FieldCodec::Text),
    FieldSpec::defaulted("eventSubscriptionArn", FieldCodec::Text),
    FieldSpec::defaulted("eventVersion", FieldCodec::Float),
    FieldSpec::required("sns", FieldCodec::Notification),
];

pub const NOTIFICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::defaulted("message", FieldCodec::Text),
    FieldSpec::defaulted("messageAttributes", FieldCodec::Placeholder),
    FieldSpec::defaulted("messageId", FieldCodec::Text),
    FieldSpec::defaulted("signature", FieldCodec::Text),
    FieldSpec::defaulted("signatureVersion", FieldCodec::Integer),
    FieldSpec::defaulted("signingCertUrl", FieldCodec::Text),
    FieldSpec::required("timestamp", FieldCodec::Timestamp),
    FieldSpec::defaulted("topicArn", FieldCodec::Text),
    FieldSpec::defaulted("type", FieldCodec::Text),
    FieldSpec::defaulted("unsubscribeUrl", FieldCodec::Text),
];

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A decoded field, before it is moved into its struct.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(Timestamp),
    Placeholder(AttributePlaceholder),
    Notification(Box<Notification>),
}

impl FieldCodec {
    pub fn decode(self, field: &str, raw: &Value) -> Result<FieldValue, DecodeError> {
        match self {
            FieldCodec::Text => match raw {
                Value::String(s) => Ok(FieldValue::Text(s.clone())),
                other => Err(expected(field, "a string", other)),
            },
            FieldCodec::Integer => raw
                .as_i64()
                .map(FieldValue::Integer)
                .ok_or_else(|| expected(field, "an integer", raw)),
            FieldCodec::Float => raw
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| expected(field, "a number", raw)),
            FieldCodec::Timestamp => timestamp::decode(field, raw),
            FieldCodec::Placeholder => placeholder::decode(field, raw),
            FieldCodec::Notification => match raw {
                Value::Object(object) => {
                    super::notification_from_object(object).map(|n| FieldValue::Notification(Box::new(n)))
                }
                other => Err(expected(field, "an object", other)),
            },
        }
    }

    pub fn encode(self, field: &str, value: &FieldValue, unit: EpochUnit) -> Result<Value, EncodeError> {
        match (self, value) {
            (FieldCodec::Placeholder, _) => Ok(placeholder::encode()),
            (FieldCodec::Timestamp, FieldValue::Timestamp(ts)) => timestamp::encode(field, *ts, unit),
            (_, value) => pass_through(field, value, unit),
        }
    }
}

fn pass_through(field: &str, value: &FieldValue, unit: EpochUnit) -> Result<Value, EncodeError> {
    match value {
        FieldValue::Text(s) => Ok(Value::String(s.clone())),
        FieldValue::Integer(n) => Ok(Value::from(*n)),
        FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
            EncodeError::OutOfRange {
                field: field.to_string(),
                reason: format!("{f} has no JSON representation"),
            }
        }),
        FieldValue::Timestamp(ts) => Ok(Value::String(ts.to_rfc3339())),
        FieldValue::Placeholder(_) => Ok(placeholder::encode()),
        FieldValue::Notification(n) => super::notification_to_object(n, unit).map(Value::Object),
    }
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn expected(field: &str, what: &str, found: &Value) -> DecodeError {
    DecodeError::mismatch(field, format!("expected {what}, found {}", describe(found)))
}

// ---------------------------------------------------------------------------
// Key lookup
// ---------------------------------------------------------------------------

/// Find `name` in `object`: exact key first, then ASCII-case-insensitive.
///
/// Publishers disagree on casing (`MessageId`, `messageID`, `messageId`).
pub fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

// ---------------------------------------------------------------------------
// FieldSet
// ---------------------------------------------------------------------------

/// Field values keyed by canonical name.
#[derive(Debug, Default)]
pub(crate) struct FieldSet {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FieldSet {
    /// Decode every field in `specs` from `object`.
    pub(crate) fn read(object: &Map<String, Value>, specs: &[FieldSpec]) -> Result<Self, DecodeError> {
        let mut set = FieldSet::default();
        for spec in specs {
            match lookup(object, spec.name) {
                None | Some(Value::Null) if spec.presence == Presence::Defaulted => {}
                None => return Err(DecodeError::mismatch(spec.name, "required field is missing")),
                Some(raw) => {
                    let value = spec.codec.decode(spec.name, raw)?;
                    set.values.insert(spec.name, value);
                }
            }
        }
        Ok(set)
    }

    /// Encode every field in `specs` into a JSON object. Fields with no value
    /// are omitted unless their codec always writes something.
    pub(crate) fn write(&self, specs: &[FieldSpec], unit: EpochUnit) -> Result<Map<String, Value>, EncodeError> {
        let mut object = Map::new();
        for spec in specs {
            let encoded = match (self.values.get(spec.name), spec.codec) {
                (Some(value), codec) => codec.encode(spec.name, value, unit)?,
                (None, FieldCodec::Placeholder) => placeholder::encode(),
                (None, _) => continue,
            };
            object.insert(spec.name.to_string(), encoded);
        }
        Ok(object)
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    pub(crate) fn text(&mut self, name: &'static str) -> Result<String, DecodeError> {
        match self.values.remove(name) {
            None => Ok(String::new()),
            Some(FieldValue::Text(s)) => Ok(s),
            Some(other) => Err(wrong_codec(name, "text", &other)),
        }
    }

    pub(crate) fn integer(&mut self, name: &'static str) -> Result<i64, DecodeError> {
        match self.values.remove(name) {
            None => Ok(0),
            Some(FieldValue::Integer(n)) => Ok(n),
            Some(other) => Err(wrong_codec(name, "integer", &other)),
        }
    }

    pub(crate) fn float(&mut self, name: &'static str) -> Result<f64, DecodeError> {
        match self.values.remove(name) {
            None => Ok(0.0),
            Some(FieldValue::Float(f)) => Ok(f),
            Some(FieldValue::Integer(n)) => Ok(n as f64),
            Some(other) => Err(wrong_codec(name, "number", &other)),
        }
    }

    pub(crate) fn placeholder(&mut self, name: &'static str) -> Result<Option<AttributePlaceholder>, DecodeError> {
        match self.values.remove(name) {
            None => Ok(None),
            Some(FieldValue::Placeholder(p)) => Ok(Some(p)),
            Some(other) => Err(wrong_codec(name, "placeholder", &other)),
        }
    }

    pub(crate) fn timestamp(&mut self, name: &'static str) -> Result<Timestamp, DecodeError> {
        match self.values.remove(name) {
            None => Err(DecodeError::mismatch(name, "required field is missing")),
            Some(FieldValue::Timestamp(ts)) => Ok(ts),
            Some(other) => Err(wrong_codec(name, "timestamp", &other)),
        }
    }

    pub(crate) fn notification(&mut self, name: &'static str) -> Result<Notification, DecodeError> {
        match self.values.remove(name) {
            None => Err(DecodeError::mismatch(name, "required field is missing")),
            Some(FieldValue::Notification(n)) => Ok(*n),
            Some(other) => Err(wrong_codec(name, "notification", &other)),
        }
    }
}

fn wrong_codec(name: &str, wanted: &str, got: &FieldValue) -> DecodeError {
    DecodeError::mismatch(name, format!("codec produced {got:?}, struct expects {wanted}"))
}
