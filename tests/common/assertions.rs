//! Domain-specific assertion macros for s3-format-fixer harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! part of the repaired record was wrong.

/// Assert that encoded JSON bytes hold `expected` at a JSON pointer.
///
/// ```rust
/// assert_json_at!(bytes, "/sns/timestamp", 1686830400000_i64);
/// ```
#[macro_export]
macro_rules! assert_json_at {
    (@check $bytes:expr, $pointer:expr, $expected:expr) => {{
        let value: serde_json::Value =
            serde_json::from_slice(&$bytes).expect("assert_json_at!: output is not JSON");
        let pointer: &str = $pointer;
        let expected: serde_json::Value = $expected;
        match value.pointer(pointer) {
            Some(actual) => pretty_assertions::assert_eq!(
                actual, &expected,
                "assert_json_at! failed at {:?}", pointer
            ),
            None => panic!(
                "assert_json_at! failed: nothing at {:?} in {}",
                pointer, value
            ),
        }
    }};
    // JSON object literals must reach `json!` as raw tokens; matched as
    // `expr`, `{}` would be an empty block (unit) and serialize as null.
    ($bytes:expr, $pointer:expr, { $($json:tt)* }) => {
        $crate::assert_json_at!(@check $bytes, $pointer, serde_json::json!({ $($json)* }))
    };
    ($bytes:expr, $pointer:expr, $expected:expr) => {
        $crate::assert_json_at!(@check $bytes, $pointer, serde_json::json!($expected))
    };
}

/// Assert that a decode result is a schema mismatch on `field`.
#[macro_export]
macro_rules! assert_schema_mismatch {
    ($result:expr, $field:expr) => {{
        match $result {
            Err(fixer_core::DecodeError::SchemaMismatch { ref field, ref reason }) => {
                pretty_assertions::assert_eq!(
                    field.as_str(), $field,
                    "assert_schema_mismatch! wrong field (reason: {})", reason
                );
            }
            other => panic!(
                "assert_schema_mismatch! failed: expected SchemaMismatch on {:?}, got {:?}",
                $field, other
            ),
        }
    }};
}

/// Assert that `text` parses as strict JSON.
pub fn assert_strict_json(text: &str) {
    if let Err(err) = serde_json::from_str::<serde_json::Value>(text) {
        panic!("expected strict JSON, got error {err}:\n{text}");
    }
}
