//! Single-record repair: raw bytes → canonical JSON bytes.
//!
//! ```text
//! raw bytes ──► normalize ──► decode ──► Envelope ──► encode ──► canonical bytes
//! ```

use tracing::debug;

use crate::codec::EnvelopeCodec;
use crate::error::RepairError;
use crate::normalizer;
use crate::types::Envelope;

/// Output of a successful [`repair`].
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub envelope: Envelope,
    pub bytes: Vec<u8>,
}

/// Repair one stored record.
///
/// Invalid UTF-8 in `raw` is replaced rather than rejected; the decoder
/// reports whatever the normalizer could not fix.
pub fn repair(raw: &[u8], codec: &EnvelopeCodec) -> Result<Repaired, RepairError> {
    let text = String::from_utf8_lossy(raw);
    let strict = normalizer::normalize(&text);
    let envelope = codec.decode(&strict)?;
    let bytes = codec.encode(&envelope)?;
    debug!(
        message_id = %envelope.sns.message_id,
        in_len = raw.len(),
        out_len = bytes.len(),
        "record repaired"
    );
    Ok(Repaired { envelope, bytes })
}
