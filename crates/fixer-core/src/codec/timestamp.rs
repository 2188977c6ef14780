//! Timestamp codec: RFC3339 text on decode, epoch number on encode.

use serde_json::Value;

use super::field::{expected, FieldValue};
use crate::error::{DecodeError, EncodeError};
use crate::types::{EpochUnit, Timestamp};

pub(crate) fn decode(field: &str, raw: &Value) -> Result<FieldValue, DecodeError> {
    let Value::String(text) = raw else {
        return Err(expected(field, "an RFC3339 timestamp string", raw));
    };
    Timestamp::parse_rfc3339(text)
        .map(FieldValue::Timestamp)
        .map_err(|err| DecodeError::mismatch(field, format!("{text:?} is not an RFC3339 timestamp: {err}")))
}

pub(crate) fn encode(field: &str, ts: Timestamp, unit: EpochUnit) -> Result<Value, EncodeError> {
    ts.to_epoch(unit)
        .map(Value::from)
        .ok_or_else(|| EncodeError::OutOfRange {
            field: field.to_string(),
            reason: format!("{ts} does not fit in a signed 64-bit {unit} offset"),
        })
}
