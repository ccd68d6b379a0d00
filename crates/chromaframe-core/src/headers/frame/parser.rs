use serde::{Deserialize, Serialize};

use crate::bits::BitCursor;
use crate::headers::common::checksum::header_crc32;

use super::error::FrameHeaderError;
use super::reader::FrameHeaderReader;

/// Verified per-frame header. `frame_hash` is the authority for payload
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    /// SHA-256 of the whole stream, lowercase hex.
    pub stream_hash: String,
    /// SHA-256 of this frame's payload bits, lowercase hex.
    pub frame_hash: String,
    pub frame_number: u32,
    /// Number of payload blocks carried by this frame.
    pub block_count: u32,
}

/// Decode and verify a frame header from the start of `cursor`.
///
/// # Errors
/// `ChecksumMismatch` is frame-recoverable: the caller skips the frame.
/// A truncated buffer yields `Bits`.
pub fn decode_frame_header(cursor: &mut BitCursor<'_>) -> Result<FrameHeader, FrameHeaderError> {
    tracing::debug!("decoding frame header");
    let mut reader = FrameHeaderReader::new(cursor);
    reader.require_layout()?;

    reader.rewind()?;
    let (region, expected_crc) = reader.read_checksum_region()?;
    let computed_crc = header_crc32(&region);
    if computed_crc != expected_crc {
        tracing::warn!(
            expected = expected_crc,
            computed = computed_crc,
            "frame header checksum mismatch"
        );
        return Err(FrameHeaderError::ChecksumMismatch {
            expected: expected_crc,
            computed: computed_crc,
        });
    }

    reader.rewind()?;
    let (stream_hash, frame_hash) = reader.read_hashes()?;
    let (frame_number, block_count) = reader.read_counters()?;

    tracing::debug!(frame_number, block_count, "frame header verified");
    Ok(FrameHeader {
        stream_hash,
        frame_hash,
        frame_number,
        block_count,
    })
}
