#![allow(unused)]
//! Envelope codec integration harness.
//!
//! # What this covers
//!
//! - **Timestamp codec**: RFC3339 in, epoch millis out (nanos when selected).
//! - **Placeholder codec**: any `messageAttributes` object comes out as `{}`.
//! - **Schema mismatches**: missing or mis-shaped fields name the field.
//! - **Malformed input**: reported with a byte offset.
//! - **Encode range checks**: nanosecond overflow and non-finite floats.
//!
//! # Running
//!
//! ```sh
//! cargo test --test codec_harness
//! ```

mod common;
use common::*;
use fixer_core::{decode, encode, is_canonical, DecodeErrorKind, EncodeError, EnvelopeCodec, EpochUnit};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn strict_record(sns: &str) -> String {
    format!(r#"{{"eventVersion": 1.0, "eventSource": "aws:sns", "sns": {{{sns}}}}}"#)
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

#[test]
fn timestamp_round_trips_to_millis() {
    let envelope = decode(&strict_record(r#""timestamp": "2023-01-01T00:00:00.000Z""#)).unwrap();
    let bytes = encode(&envelope).unwrap();
    assert_json_at!(bytes, "/sns/timestamp", 1_672_531_200_000_i64);
}

#[rstest]
#[case::millis(EpochUnit::Millis, 1_686_830_400_000_i64)]
#[case::nanos(EpochUnit::Nanos, 1_686_830_400_000_000_000_i64)]
fn timestamp_unit_policy(#[case] unit: EpochUnit, #[case] expected: i64) {
    let codec = EnvelopeCodec::new(unit);
    let bytes = codec
        .encode(&EnvelopeBuilder::new("2023-06-15T12:00:00Z").build())
        .unwrap();
    assert_json_at!(bytes, "/sns/timestamp", expected);
}

#[test]
fn nanos_overflow_is_out_of_range() {
    let envelope = EnvelopeBuilder::new("2262-04-12T00:00:00Z").build();
    let err = EnvelopeCodec::new(EpochUnit::Nanos).encode(&envelope).unwrap_err();
    assert!(matches!(err, EncodeError::OutOfRange { ref field, .. } if field == "timestamp"));
}

#[rstest]
#[case::word(r#""not-a-date""#)]
#[case::date_only(r#""2023-01-01""#)]
#[case::number("1672531200000")]
#[case::null("null")]
fn bad_timestamps_are_schema_mismatches(#[case] raw: &str) {
    let result = decode(&strict_record(&format!(r#""timestamp": {raw}"#)));
    assert_schema_mismatch!(result, "timestamp");
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

#[rstest]
#[case::flat(r#"{"a": "b", "c": "d"}"#)]
#[case::nested(r#"{"Type": {"DataType": "String", "StringValue": "x"}}"#)]
#[case::empty("{}")]
fn attributes_are_erased(#[case] attributes: &str) {
    let text = strict_record(&format!(
        r#""messageAttributes": {attributes}, "timestamp": "2023-01-01T00:00:00Z""#
    ));
    let bytes = encode(&decode(&text).unwrap()).unwrap();
    assert_json_at!(bytes, "/sns/messageAttributes", {});
}

#[test]
fn absent_attributes_still_encode_as_empty_object() {
    let bytes = encode(&EnvelopeBuilder::new("2023-01-01T00:00:00Z").build()).unwrap();
    assert_json_at!(bytes, "/sns/messageAttributes", {});
}

#[test]
fn present_attributes_encode_as_empty_object() {
    let bytes = encode(&EnvelopeBuilder::new("2023-01-01T00:00:00Z").with_attributes().build()).unwrap();
    assert_json_at!(bytes, "/sns/messageAttributes", {});
}

#[test]
fn non_object_attributes_are_schema_mismatches() {
    let text = strict_record(r#""messageAttributes": "a=b", "timestamp": "2023-01-01T00:00:00Z""#);
    assert_schema_mismatch!(decode(&text), "messageAttributes");
}

// ---------------------------------------------------------------------------
// Other fields
// ---------------------------------------------------------------------------

#[test]
fn pass_through_fields_are_copied() {
    let envelope = EnvelopeBuilder::new("2023-01-01T00:00:00Z")
        .message("hello, world")
        .message_id("abc-123")
        .signature_version(2)
        .event_version(1.5)
        .build();
    let bytes = encode(&envelope).unwrap();
    assert_json_at!(bytes, "/sns/message", "hello, world");
    assert_json_at!(bytes, "/sns/messageId", "abc-123");
    assert_json_at!(bytes, "/sns/signatureVersion", 2);
    assert_json_at!(bytes, "/sns/type", "Notification");
    assert_json_at!(bytes, "/eventVersion", 1.5);
    assert_json_at!(bytes, "/eventSource", "aws:sns");
}

#[test]
fn quoted_signature_version_is_a_schema_mismatch() {
    let text = strict_record(r#""signatureVersion": "1", "timestamp": "2023-01-01T00:00:00Z""#);
    assert_schema_mismatch!(decode(&text), "signatureVersion");
}

#[test]
fn missing_optional_fields_default_to_empty() {
    let envelope = decode(r#"{"sns": {"timestamp": "2023-01-01T00:00:00Z"}}"#).unwrap();
    assert_eq!(envelope.event_version, 0.0);
    assert_eq!(envelope.event_source, "");
    assert_eq!(envelope.sns.message, "");
    assert_eq!(envelope.sns.signature_version, 0);
    assert_eq!(envelope.sns.message_attributes, None);
}

#[test]
fn acronym_and_pascal_case_keys_decode() {
    let text = r#"{"Sns": {"MessageID": "m-9", "SigningCertURL": "https://example.com/c.pem", "Timestamp": "2023-01-01T00:00:00Z"}}"#;
    let envelope = decode(text).unwrap();
    assert_eq!(envelope.sns.message_id, "m-9");
    assert_eq!(envelope.sns.signing_cert_url, "https://example.com/c.pem");

    let bytes = encode(&envelope).unwrap();
    assert_json_at!(bytes, "/sns/messageId", "m-9");
    assert_json_at!(bytes, "/sns/signingCertUrl", "https://example.com/c.pem");
}

#[test]
fn non_finite_event_version_is_out_of_range() {
    let envelope = EnvelopeBuilder::new("2023-01-01T00:00:00Z")
        .event_version(f64::INFINITY)
        .build();
    let err = encode(&envelope).unwrap_err();
    assert!(matches!(err, EncodeError::OutOfRange { ref field, .. } if field == "eventVersion"));
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn malformed_text_reports_offset() {
    let text = r#"{"sns": {"message": hello world}}"#;
    let err = decode(text).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Malformed);
    // `h` of the unquoted value.
    assert_eq!(err.offset(), Some(text.find("hello").unwrap()));
}

#[test]
fn encoded_output_is_canonical_and_not_redecodable() {
    let bytes = encode(&EnvelopeBuilder::new("2023-01-01T00:00:00Z").build()).unwrap();
    assert!(is_canonical(&bytes));
    let text = String::from_utf8(bytes).unwrap();
    assert_schema_mismatch!(decode(&text), "timestamp");
}
