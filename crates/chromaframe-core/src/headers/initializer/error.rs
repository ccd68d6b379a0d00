use thiserror::Error;

use crate::bits::BitError;
use crate::error::{FailureKind, Severity};
use crate::palette::PaletteError;

/// Errors returned while decoding the stream initializer. All of them stop
/// the stream.
///
/// # Examples
/// ```
/// use chromaframe_core::headers::InitializerError;
///
/// let err = InitializerError::UnsupportedProtocol { version: 3, supported: vec![1, 2] };
/// assert!(err.to_string().contains("unsupported protocol version 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitializerError {
    #[error("initializer checksum mismatch: header carries {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },
    #[error("unsupported protocol version {version} (supported: {supported:?})")]
    UnsupportedProtocol { version: u8, supported: Vec<u8> },
    #[error(
        "geometry mismatch: lock-on found {expected_height}x{expected_width} blocks, initializer carries {actual_height}x{actual_width}"
    )]
    GeometryMismatch {
        expected_height: u16,
        expected_width: u16,
        actual_height: u16,
        actual_width: u16,
    },
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("malformed initializer: {0}")]
    Bits(#[from] BitError),
}

impl InitializerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InitializerError::ChecksumMismatch { .. } => FailureKind::ChecksumMismatch,
            InitializerError::UnsupportedProtocol { .. } => FailureKind::UnsupportedProtocol,
            InitializerError::GeometryMismatch { .. } => FailureKind::GeometryMismatch,
            InitializerError::Palette(err) => err.kind(),
            InitializerError::Bits(err) => err.kind(),
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::StreamFatal
    }
}
