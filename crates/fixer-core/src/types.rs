//! Core types for fixer-core.
//!
//! This module defines the decoded record model shared by the codec and the
//! batch driver: the top-level [`Envelope`], its nested [`Notification`], the
//! [`Timestamp`] value and the [`AttributePlaceholder`] marker, plus the
//! [`EpochUnit`] policy used when a timestamp is written back out.
//!
//! A fresh envelope is built for every stored record and dropped once its
//! canonical bytes are produced. Nothing here is shared between records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One stored SNS notification record.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Publisher schema version, e.g. `1.0`.
    pub event_version: f64,
    /// Event source identifier, e.g. `aws:sns`.
    pub event_source: String,
    /// ARN of the subscription that delivered the record.
    pub event_subscription_arn: String,
    /// The notification payload.
    pub sns: Notification,
}

/// Nested payload of an [`Envelope`].
///
/// String fields are opaque: the codec moves them through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Arbitrary attribute map on the wire, kept only as a marker.
    pub message_attributes: Option<AttributePlaceholder>,
    pub signing_cert_url: String,
    pub message_id: String,
    /// Free-text message body.
    pub message: String,
    pub unsubscribe_url: String,
    /// The `type` discriminator, usually `Notification`.
    pub kind: String,
    pub signature_version: i64,
    pub signature: String,
    pub timestamp: Timestamp,
    pub topic_arn: String,
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A single point in time, decoded from RFC3339 text and encoded as an
/// epoch offset (see [`EpochUnit`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse strict RFC3339 text. Any other lexical form is an error.
    pub fn parse_rfc3339(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|ts| Self(ts.with_timezone(&Utc)))
    }

    /// Offset from the Unix epoch in `unit`, or `None` when it does not fit
    /// in an `i64`.
    pub fn to_epoch(&self, unit: EpochUnit) -> Option<i64> {
        match unit {
            EpochUnit::Millis => Some(self.0.timestamp_millis()),
            EpochUnit::Nanos => self.0.timestamp_nanos_opt(),
        }
    }

    /// RFC3339 rendering with millisecond precision and a `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// AttributePlaceholder
// ---------------------------------------------------------------------------

/// Stand-in for the `messageAttributes` map.
///
/// Any well-formed object decodes to this marker and it always encodes back
/// to `{}`. The original attributes are discarded on purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributePlaceholder;

// ---------------------------------------------------------------------------
// EpochUnit
// ---------------------------------------------------------------------------

/// Resolution of the numeric timestamp written on encode.
///
/// `Millis` is canonical. `Nanos` matches an older publisher variant and is
/// only used when explicitly selected. Config and CLI accept the same
/// spellings, both going through [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EpochUnit {
    #[default]
    Millis,
    Nanos,
}

impl std::fmt::Display for EpochUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpochUnit::Millis => write!(f, "millis"),
            EpochUnit::Nanos => write!(f, "nanos"),
        }
    }
}

/// Returned when parsing an [`EpochUnit`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timestamp unit {0:?} (expected `millis` or `nanos`)")]
pub struct UnknownEpochUnit(pub String);

impl FromStr for EpochUnit {
    type Err = UnknownEpochUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "millis" | "ms" => Ok(EpochUnit::Millis),
            "nanos" | "ns" => Ok(EpochUnit::Nanos),
            other => Err(UnknownEpochUnit(other.to_string())),
        }
    }
}

impl TryFrom<String> for EpochUnit {
    type Error = UnknownEpochUnit;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_to_millis() {
        let ts = Timestamp::parse_rfc3339("2023-01-01T00:00:00.000Z").unwrap();
        assert_eq!(ts.to_epoch(EpochUnit::Millis), Some(1_672_531_200_000));
        assert_eq!(ts.to_epoch(EpochUnit::Nanos), Some(1_672_531_200_000_000_000));
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let ts = Timestamp::parse_rfc3339("2023-01-01T02:00:00+02:00").unwrap();
        assert_eq!(ts.to_epoch(EpochUnit::Millis), Some(1_672_531_200_000));
        assert_eq!(ts.to_string(), "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn non_rfc3339_text_is_rejected() {
        assert!(Timestamp::parse_rfc3339("not-a-date").is_err());
        assert!(Timestamp::parse_rfc3339("2023-01-01").is_err());
        assert!(Timestamp::parse_rfc3339("1672531200000").is_err());
    }

    #[test]
    fn nanos_overflow_past_2262() {
        let ts = Timestamp::parse_rfc3339("2300-01-01T00:00:00Z").unwrap();
        assert_eq!(ts.to_epoch(EpochUnit::Nanos), None);
        assert!(ts.to_epoch(EpochUnit::Millis).is_some());
    }

    #[test]
    fn epoch_unit_from_str() {
        assert_eq!("millis".parse::<EpochUnit>(), Ok(EpochUnit::Millis));
        assert_eq!("NANOS".parse::<EpochUnit>(), Ok(EpochUnit::Nanos));
        assert!("seconds".parse::<EpochUnit>().is_err());
    }

    #[test]
    fn epoch_unit_deserializes_every_cli_spelling() {
        for (text, unit) in [
            ("\"millis\"", EpochUnit::Millis),
            ("\"ms\"", EpochUnit::Millis),
            ("\"NANOS\"", EpochUnit::Nanos),
            ("\"ns\"", EpochUnit::Nanos),
        ] {
            assert_eq!(serde_json::from_str::<EpochUnit>(text).unwrap(), unit, "{text}");
        }
        assert!(serde_json::from_str::<EpochUnit>("\"seconds\"").is_err());
        assert_eq!(serde_json::to_string(&EpochUnit::Nanos).unwrap(), "\"nanos\"");
    }
}
