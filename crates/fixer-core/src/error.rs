//! Error taxonomy for the repair pipeline.
//!
//! Normalization has no error type: it always produces text, and any defect
//! it leaves behind surfaces here as a [`DecodeError`].

/// Which kind of decode failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// The text is not syntactically valid JSON.
    Malformed,
    /// The JSON is valid but a field is missing or has the wrong shape.
    SchemaMismatch,
}

/// Failure to turn strict JSON text into an [`Envelope`](crate::Envelope).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },

    #[error("field `{field}` does not match the envelope schema: {reason}")]
    SchemaMismatch { field: String, reason: String },
}

impl DecodeError {
    pub(crate) fn mismatch(field: &str, reason: impl Into<String>) -> Self {
        DecodeError::SchemaMismatch {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Malformed { .. } => DecodeErrorKind::Malformed,
            DecodeError::SchemaMismatch { .. } => DecodeErrorKind::SchemaMismatch,
        }
    }

    /// Byte offset into the decoded text, for malformed input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::Malformed { offset, .. } => Some(*offset),
            DecodeError::SchemaMismatch { .. } => None,
        }
    }

    /// Name of the offending field, for schema mismatches.
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::Malformed { .. } => None,
            DecodeError::SchemaMismatch { field, .. } => Some(field),
        }
    }
}

/// Failure to encode an [`Envelope`](crate::Envelope) as JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("field `{field}` is out of range for its numeric encoding: {reason}")]
    OutOfRange { field: String, reason: String },
}

/// Failure of the single-record [`repair`](crate::pipeline::repair) pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),
}
