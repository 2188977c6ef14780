//! Static record corpora used across harnesses.
//!
//! The quasi-JSON records mirror what the upstream publisher actually wrote:
//! bare keys, single-quoted strings, quoted numbers and RFC3339 timestamps.

/// A full record in the publisher's quasi-JSON layout, one field per line.
pub const QUASI_RECORD: &str = r#"{
  eventVersion: 1.0,
  eventSource: aws:sns,
  eventSubscriptionArn: arn:aws:sns:us-east-1:123456789012:xbo-ci-device:7c6a1d2e-5f0b-4a57-9b7e-3f1c2d4e5a6b,
  sns: {
    messageAttributes: {},
    signingCertUrl: https://sns.us-east-1.amazonaws.com/SimpleNotificationService-0000000000000000000000.pem,
    messageId: 95df01b4-ee98-5cb9-9903-4c221d41eb5e,
    message: 'device-registered',
    unsubscribeUrl: https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe&SubscriptionArn=arn:aws:sns:us-east-1:123456789012:xbo-ci-device:7c6a1d2e,
    type: Notification,
    signatureVersion: '1',
    signature: EXAMPLEpH+DcEwjAPg8O9mY8dReBSwksfg2S7WKQcikcNKWLQjwu6A4VbeS0QHVCkhRS7fUQvi2egU3N858fiTDN6bkkOxYDVrY0Ad8L10Hs3zH81mtnPk5uvvolIC1CXGu43obcgFxeL3khZl8IKvO61GWB6jI9b5+gLPoBc1Q=,
    timestamp: "2023-06-15T12:00:00.000Z",
    topicArn: arn:aws:sns:us-east-1:123456789012:xbo-ci-device
  }
}"#;

/// The notification fields from the end-to-end scenario, as one flat line.
pub const FLAT_NOTIFICATION: &str = r#"messageId: abc-123, signatureVersion: "1", timestamp: "2023-06-15T12:00:00Z", type: Notification, message: hello"#;

/// Milliseconds since the epoch for `2023-06-15T12:00:00Z`.
pub const JUNE_15_NOON_MILLIS: i64 = 1_686_830_400_000;

/// A record whose free-text message cannot be repaired by the normalizer.
pub const UNREPAIRABLE_RECORD: &str =
    r#"{sns: {message: device went offline, timestamp: "2023-06-15T12:00:00Z"}}"#;

/// A record whose timestamp is not RFC3339.
pub const BAD_TIMESTAMP_RECORD: &str =
    r#"{sns: {messageId: m-1, timestamp: "not-a-date", type: Notification}}"#;

/// The same notification written with every key-quoting style the
/// publisher has been seen to use.
pub const CORPUS_KEY_STYLES: &[&str] = &[
    r#"{sns: {messageId: m-1, timestamp: "2023-06-15T12:00:00Z"}}"#,
    r#"{'sns': {'messageId': 'm-1', 'timestamp': '2023-06-15T12:00:00Z'}}"#,
    r#"{"sns": {"messageId": "m-1", "timestamp": "2023-06-15T12:00:00Z"}}"#,
    "{\n  sns: {\n    messageId: m-1,\n    timestamp: 2023-06-15T12:00:00Z\n  }\n}",
];

/// Wrap a flat `key: value` notification line into an envelope.
pub fn wrap_notification(fields: &str) -> String {
    format!("{{eventVersion: 1.0, eventSource: aws:sns, sns: {{{fields}}}}}")
}
