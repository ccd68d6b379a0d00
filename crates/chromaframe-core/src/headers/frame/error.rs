use thiserror::Error;

use crate::bits::BitError;
use crate::error::{FailureKind, Severity};

/// Errors returned while decoding a frame header.
///
/// # Examples
/// ```
/// use chromaframe_core::error::Severity;
/// use chromaframe_core::headers::FrameHeaderError;
///
/// let err = FrameHeaderError::ChecksumMismatch { expected: 1, computed: 2 };
/// assert_eq!(err.severity(), Severity::FrameRecoverable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameHeaderError {
    #[error("frame header checksum mismatch: header carries {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },
    #[error("malformed frame header: {0}")]
    Bits(#[from] BitError),
}

impl FrameHeaderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FrameHeaderError::ChecksumMismatch { .. } => FailureKind::ChecksumMismatch,
            FrameHeaderError::Bits(err) => err.kind(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FrameHeaderError::ChecksumMismatch { .. } => Severity::FrameRecoverable,
            FrameHeaderError::Bits(_) => Severity::StreamFatal,
        }
    }
}
