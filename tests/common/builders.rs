//! Test builders: ergonomic constructors for `Envelope` values.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use fixer_core::{AttributePlaceholder, Envelope, Notification, Timestamp};

/// Fluent builder for [`Envelope`] test fixtures.
///
/// ```rust
/// let envelope = EnvelopeBuilder::new("2023-06-15T12:00:00Z")
///     .message("hello")
///     .signature_version(1)
///     .build();
/// ```
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    pub fn new(timestamp: &str) -> Self {
        Self {
            envelope: Envelope {
                event_version: 1.0,
                event_source: "aws:sns".to_string(),
                event_subscription_arn: "arn:aws:sns:us-east-1:123456789012:topic:sub".to_string(),
                sns: Notification {
                    message_attributes: None,
                    signing_cert_url: String::new(),
                    message_id: "m-1".to_string(),
                    message: String::new(),
                    unsubscribe_url: String::new(),
                    kind: "Notification".to_string(),
                    signature_version: 1,
                    signature: String::new(),
                    timestamp: Timestamp::parse_rfc3339(timestamp).expect("fixture timestamp"),
                    topic_arn: "arn:aws:sns:us-east-1:123456789012:topic".to_string(),
                },
            },
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.envelope.sns.message = message.into();
        self
    }

    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.envelope.sns.message_id = id.into();
        self
    }

    pub fn signature_version(mut self, version: i64) -> Self {
        self.envelope.sns.signature_version = version;
        self
    }

    pub fn event_version(mut self, version: f64) -> Self {
        self.envelope.event_version = version;
        self
    }

    pub fn with_attributes(mut self) -> Self {
        self.envelope.sns.message_attributes = Some(AttributePlaceholder);
        self
    }

    pub fn build(self) -> Envelope {
        self.envelope
    }
}
