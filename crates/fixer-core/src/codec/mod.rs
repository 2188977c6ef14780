//! Envelope codec: strict JSON text ⇄ [`Envelope`].
//!
//! Decoding parses the text with `serde_json`, then walks the
//! [`ENVELOPE_FIELDS`](field::ENVELOPE_FIELDS) and
//! [`NOTIFICATION_FIELDS`](field::NOTIFICATION_FIELDS) tables, handing each
//! field to its [`FieldCodec`](field::FieldCodec). Encoding walks the same
//! tables in reverse and produces compact JSON with keys in sorted order.
//!
//! ```text
//! "timestamp": "2023-01-01T00:00:00.000Z"  ──decode──►  Timestamp  ──encode──►  "timestamp": 1672531200000
//! "messageAttributes": {"a": "b"}          ──decode──►  Placeholder ──encode──►  "messageAttributes": {}
//! ```

pub mod field;
mod placeholder;
mod timestamp;

use serde_json::error::Category;
use serde_json::{Map, Value};

use crate::error::{DecodeError, EncodeError};
use crate::types::{EpochUnit, Envelope, Notification};
use field::{FieldSet, FieldValue, ENVELOPE_FIELDS, NOTIFICATION_FIELDS};

/// Stateless decoder/encoder parameterised by the timestamp output unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeCodec {
    unit: EpochUnit,
}

impl EnvelopeCodec {
    pub fn new(unit: EpochUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> EpochUnit {
        self.unit
    }

    /// Decode strict JSON text into an [`Envelope`].
    ///
    /// # Errors
    ///
    /// [`DecodeError::Malformed`] with a byte offset when `text` is not JSON,
    /// [`DecodeError::SchemaMismatch`] naming the field when a required field
    /// is missing or a field has the wrong shape.
    pub fn decode(&self, text: &str) -> Result<Envelope, DecodeError> {
        let root: Value = serde_json::from_str(text).map_err(|err| DecodeError::Malformed {
            offset: error_offset(text, &err),
            message: err.to_string(),
        })?;
        match root {
            Value::Object(object) => envelope_from_object(&object),
            other => Err(field::expected("envelope", "an object", &other)),
        }
    }

    /// Encode an [`Envelope`] as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// [`EncodeError::OutOfRange`] when the timestamp does not fit the
    /// configured unit or a float field is not finite.
    pub fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
        let object = envelope_to_object(envelope, self.unit)?;
        Ok(Value::Object(object).to_string().into_bytes())
    }
}

/// Decode with the default codec.
pub fn decode(text: &str) -> Result<Envelope, DecodeError> {
    EnvelopeCodec::default().decode(text)
}

/// Encode with the default codec (millisecond timestamps).
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
    EnvelopeCodec::default().encode(envelope)
}

/// True when `raw` is already strict JSON with a numeric `sns.timestamp`,
/// i.e. it was written by this codec on an earlier run.
pub fn is_canonical(raw: &[u8]) -> bool {
    let Ok(Value::Object(root)) = serde_json::from_slice::<Value>(raw) else {
        return false;
    };
    field::lookup(&root, "sns")
        .and_then(Value::as_object)
        .and_then(|sns| field::lookup(sns, "timestamp"))
        .is_some_and(Value::is_number)
}

// ---------------------------------------------------------------------------
// Struct <-> field set
// ---------------------------------------------------------------------------

fn envelope_from_object(object: &Map<String, Value>) -> Result<Envelope, DecodeError> {
    let mut fields = FieldSet::read(object, ENVELOPE_FIELDS)?;
    Ok(Envelope {
        event_version: fields.float("eventVersion")?,
        event_source: fields.text("eventSource")?,
        event_subscription_arn: fields.text("eventSubscriptionArn")?,
        sns: fields.notification("sns")?,
    })
}

pub(crate) fn notification_from_object(object: &Map<String, Value>) -> Result<Notification, DecodeError> {
    let mut fields = FieldSet::read(object, NOTIFICATION_FIELDS)?;
    Ok(Notification {
        message_attributes: fields.placeholder("messageAttributes")?,
        signing_cert_url: fields.text("signingCertUrl")?,
        message_id: fields.text("messageId")?,
        message: fields.text("message")?,
        unsubscribe_url: fields.text("unsubscribeUrl")?,
        kind: fields.text("type")?,
        signature_version: fields.integer("signatureVersion")?,
        signature: fields.text("signature")?,
        timestamp: fields.timestamp("timestamp")?,
        topic_arn: fields.text("topicArn")?,
    })
}

fn envelope_to_object(envelope: &Envelope, unit: EpochUnit) -> Result<Map<String, Value>, EncodeError> {
    let mut fields = FieldSet::default();
    fields.insert("eventVersion", FieldValue::Float(envelope.event_version));
    fields.insert("eventSource", FieldValue::Text(envelope.event_source.clone()));
    fields.insert(
        "eventSubscriptionArn",
        FieldValue::Text(envelope.event_subscription_arn.clone()),
    );
    fields.insert("sns", FieldValue::Notification(Box::new(envelope.sns.clone())));
    fields.write(ENVELOPE_FIELDS, unit)
}

pub(crate) fn notification_to_object(
    sns: &Notification,
    unit: EpochUnit,
) -> Result<Map<String, Value>, EncodeError> {
    let mut fields = FieldSet::default();
    if let Some(placeholder) = sns.message_attributes {
        fields.insert("messageAttributes", FieldValue::Placeholder(placeholder));
    }
    fields.insert("signingCertUrl", FieldValue::Text(sns.signing_cert_url.clone()));
    fields.insert("messageId", FieldValue::Text(sns.message_id.clone()));
    fields.insert("message", FieldValue::Text(sns.message.clone()));
    fields.insert("unsubscribeUrl", FieldValue::Text(sns.unsubscribe_url.clone()));
    fields.insert("type", FieldValue::Text(sns.kind.clone()));
    fields.insert("signatureVersion", FieldValue::Integer(sns.signature_version));
    fields.insert("signature", FieldValue::Text(sns.signature.clone()));
    fields.insert("timestamp", FieldValue::Timestamp(sns.timestamp));
    fields.insert("topicArn", FieldValue::Text(sns.topic_arn.clone()));
    fields.write(NOTIFICATION_FIELDS, unit)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Byte offset of a parse error. Truncated input points one past the last
/// byte.
fn error_offset(text: &str, err: &serde_json::Error) -> usize {
    match err.classify() {
        Category::Eof => text.len(),
        _ => byte_offset(text, err.line(), err.column()),
    }
}

/// Convert serde_json's one-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
