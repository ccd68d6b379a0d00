//! Payload verification against the frame header's SHA-256 digest.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::bits::BitBuffer;
use crate::error::{FailureKind, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload hash mismatch over {bits} bits: header carries {expected}, computed {actual}")]
    PayloadHashMismatch {
        expected: String,
        actual: String,
        bits: usize,
    },
}

impl PayloadError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::PayloadHashMismatch
    }

    pub fn severity(&self) -> Severity {
        Severity::FrameRecoverable
    }
}

/// Lowercase hex SHA-256 over the payload's zero-padded bytes.
///
/// # Examples
/// ```
/// use chromaframe_core::{BitBuffer, payload_digest};
///
/// let digest = payload_digest(&BitBuffer::new());
/// assert_eq!(
///     digest,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn payload_digest(payload: &BitBuffer) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Whether the payload hashes to `expected_frame_hash` (hex, any case).
pub fn validate_payload(payload: &BitBuffer, expected_frame_hash: &str) -> bool {
    verify_payload(payload, expected_frame_hash).is_ok()
}

/// Like `validate_payload`, with the computed digest in the error.
pub fn verify_payload(
    payload: &BitBuffer,
    expected_frame_hash: &str,
) -> Result<(), PayloadError> {
    verify_digest(&payload_digest(payload), expected_frame_hash, payload.len())
}

/// Compares an already computed digest with the header's frame hash.
pub(crate) fn verify_digest(
    actual: &str,
    expected_frame_hash: &str,
    bits: usize,
) -> Result<(), PayloadError> {
    tracing::debug!(bits, "verifying payload");
    if !actual.eq_ignore_ascii_case(expected_frame_hash) {
        tracing::warn!(
            expected = expected_frame_hash,
            actual,
            bits,
            "payload hash mismatch"
        );
        return Err(PayloadError::PayloadHashMismatch {
            expected: expected_frame_hash.to_string(),
            actual: actual.to_string(),
            bits,
        });
    }
    tracing::debug!("payload validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PayloadError, payload_digest, validate_payload, verify_payload};
    use crate::bits::BitBuffer;

    fn sample_payload() -> BitBuffer {
        let mut bits = BitBuffer::new();
        bits.push_bytes(b"abc");
        bits
    }

    #[test]
    fn digest_matches_reference_vector() {
        assert_eq!(
            payload_digest(&sample_payload()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn accepts_uppercase_header_digest() {
        let payload = sample_payload();
        let expected = payload_digest(&payload).to_uppercase();
        assert!(validate_payload(&payload, &expected));
    }

    #[test]
    fn single_bit_flip_is_rejected() {
        let mut payload = sample_payload();
        let expected = payload_digest(&payload);
        payload.toggle(5);
        let err = verify_payload(&payload, &expected).unwrap_err();
        let PayloadError::PayloadHashMismatch { bits, .. } = err;
        assert_eq!(bits, 24);
    }

    #[test]
    fn partial_byte_hashes_with_zero_padding() {
        let mut payload = BitBuffer::new();
        payload.push_uint(0b11, 2);
        let mut padded = BitBuffer::new();
        padded.push_uint(0b1100_0000, 8);
        assert_eq!(payload_digest(&payload), payload_digest(&padded));
    }

    #[test]
    fn dropping_trailing_zero_bits_keeps_the_digest() {
        // 'd' = 0b0110_0100: bits 150 and 151 are zero, bit 149 is set.
        let mut full = BitBuffer::new();
        full.push_bytes(b"chromaframe payload");
        let expected = payload_digest(&full);

        for len in [151, 150] {
            let mut shortened = full.clone();
            shortened.truncate(len);
            assert!(validate_payload(&shortened, &expected), "{len} bits");
        }

        let mut shortened = full.clone();
        shortened.truncate(149);
        assert!(!validate_payload(&shortened, &expected));
    }
}
