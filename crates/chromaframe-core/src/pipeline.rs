//! Per-frame decoding with skip-and-continue semantics.
//!
//! `StreamContext` holds what the initializer establishes for the whole
//! stream. Each call to `decode_frame` is independent: recoverable failures
//! come back as `FrameOutcome::Skipped` so the caller's loop moves on to the
//! next frame, and only malformed input surfaces as `FrameError`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bits::{BitBuffer, BitCursor, BitError};
use crate::config::DecoderConfig;
use crate::error::{FailureKind, Severity};
use crate::headers::{
    FrameHeader, FrameHeaderError, InitializerError, StreamInitializer, decode_frame_header,
    decode_initializer,
};
use crate::palette::{CustomPaletteLookup, DefaultPalettes, Palette};
use crate::payload::verify_payload;
use crate::sampler::PixelGrid;
use crate::scan::{ScanError, ScanLayout, scan_blocks};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame header: {0}")]
    Header(#[from] BitError),
    #[error("payload scan: {0}")]
    Scan(#[from] ScanError),
}

impl FrameError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FrameError::Header(err) => err.kind(),
            FrameError::Scan(err) => err.kind(),
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::StreamFatal
    }
}

/// Frame whose header checksum and payload hash both verified.
#[derive(Debug, Clone)]
pub struct AcceptedFrame {
    pub header: FrameHeader,
    pub payload: BitBuffer,
}

/// Frame dropped for a recoverable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFrame {
    /// Known only when the header itself verified.
    pub frame_number: Option<u32>,
    pub kind: FailureKind,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub enum FrameOutcome {
    Accepted(AcceptedFrame),
    Skipped(SkippedFrame),
}

impl FrameOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FrameOutcome::Accepted(_))
    }
}

/// Running counts for a frame loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTally {
    pub accepted: u64,
    pub skipped_checksum: u64,
    pub skipped_payload: u64,
}

impl FrameTally {
    pub fn record(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Accepted(_) => self.accepted += 1,
            FrameOutcome::Skipped(skipped) => match skipped.kind {
                FailureKind::PayloadHashMismatch => self.skipped_payload += 1,
                _ => self.skipped_checksum += 1,
            },
        }
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_checksum + self.skipped_payload
    }

    pub fn total(&self) -> u64 {
        self.accepted + self.skipped()
    }
}

/// Stream-wide state fixed by a verified initializer.
#[derive(Debug, Clone)]
pub struct StreamContext {
    initializer: StreamInitializer,
    layout: ScanLayout,
}

impl StreamContext {
    /// Decode the initializer against the lock-on `layout`.
    ///
    /// # Errors
    /// Any `InitializerError`; all of them end the stream.
    pub fn open<C: CustomPaletteLookup + ?Sized>(
        cursor: &mut BitCursor<'_>,
        layout: ScanLayout,
        config: &DecoderConfig,
        custom: &C,
        defaults: &DefaultPalettes,
    ) -> Result<Self, InitializerError> {
        let initializer = decode_initializer(cursor, layout.geometry, config, custom, defaults)?;
        tracing::debug!(
            protocol = initializer.protocol_version,
            palette = %initializer.palette_id,
            "stream opened"
        );
        Ok(Self {
            initializer,
            layout,
        })
    }

    pub fn protocol_version(&self) -> u8 {
        self.initializer.protocol_version
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.initializer.palette
    }

    pub fn layout(&self) -> ScanLayout {
        self.layout
    }

    pub fn initializer(&self) -> &StreamInitializer {
        &self.initializer
    }

    /// Decode one frame: header, block scan from `payload_origin`, payload
    /// hash.
    ///
    /// # Errors
    /// Truncated headers and scans outside the grid. Checksum and payload
    /// hash failures are reported as `FrameOutcome::Skipped` instead.
    pub fn decode_frame<G: PixelGrid + ?Sized>(
        &self,
        header_cursor: &mut BitCursor<'_>,
        grid: &G,
        payload_origin: usize,
    ) -> Result<FrameOutcome, FrameError> {
        let header = match decode_frame_header(header_cursor) {
            Ok(header) => header,
            Err(FrameHeaderError::Bits(err)) => return Err(FrameError::Header(err)),
            Err(err) => {
                return Ok(FrameOutcome::Skipped(SkippedFrame {
                    frame_number: None,
                    kind: err.kind(),
                    reason: err.to_string(),
                }));
            }
        };

        let count = usize::try_from(header.block_count).unwrap_or(usize::MAX);
        let payload = scan_blocks(
            grid,
            self.layout,
            &self.initializer.palette,
            payload_origin,
            count,
        )?;
        Ok(self.accept_payload(header, payload))
    }

    /// Verify already-extracted payload bits against a decoded header.
    pub fn accept_payload(&self, header: FrameHeader, payload: BitBuffer) -> FrameOutcome {
        match verify_payload(&payload, &header.frame_hash) {
            Ok(()) => {
                tracing::debug!(frame_number = header.frame_number, "frame accepted");
                FrameOutcome::Accepted(AcceptedFrame { header, payload })
            }
            Err(err) => {
                tracing::warn!(frame_number = header.frame_number, "frame skipped");
                FrameOutcome::Skipped(SkippedFrame {
                    frame_number: Some(header.frame_number),
                    kind: err.kind(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameOutcome, FrameTally, SkippedFrame, StreamContext};
    use crate::bits::BitBuffer;
    use crate::error::FailureKind;
    use crate::headers::FrameHeader;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn context_is_shareable_across_threads() {
        assert_send_sync::<StreamContext>();
    }

    #[test]
    fn tally_splits_skips_by_reason() {
        let mut tally = FrameTally::default();
        let header = FrameHeader {
            stream_hash: String::new(),
            frame_hash: String::new(),
            frame_number: 1,
            block_count: 0,
        };
        tally.record(&FrameOutcome::Accepted(super::AcceptedFrame {
            header,
            payload: BitBuffer::new(),
        }));
        for kind in [
            FailureKind::ChecksumMismatch,
            FailureKind::PayloadHashMismatch,
            FailureKind::PayloadHashMismatch,
        ] {
            tally.record(&FrameOutcome::Skipped(SkippedFrame {
                frame_number: None,
                kind,
                reason: String::new(),
            }));
        }
        assert_eq!(tally.accepted, 1);
        assert_eq!(tally.skipped_checksum, 1);
        assert_eq!(tally.skipped_payload, 2);
        assert_eq!(tally.total(), 4);
    }
}
