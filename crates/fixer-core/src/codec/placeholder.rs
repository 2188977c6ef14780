//! Placeholder codec for `messageAttributes`.
//!
//! Decoding accepts any object and keeps nothing of it; encoding always
//! yields `{}`.

use serde_json::{Map, Value};

use super::field::{expected, FieldValue};
use crate::error::DecodeError;
use crate::types::AttributePlaceholder;

pub(crate) fn decode(field: &str, raw: &Value) -> Result<FieldValue, DecodeError> {
    match raw {
        Value::Object(_) => Ok(FieldValue::Placeholder(AttributePlaceholder)),
        other => Err(expected(field, "an object", other)),
    }
}

pub(crate) fn encode() -> Value {
    Value::Object(Map::new())
}
