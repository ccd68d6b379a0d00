use thiserror::Error;

use crate::error::FailureKind;

/// Errors returned by bit cursor reads and seeks.
///
/// # Examples
/// ```
/// use chromaframe_core::bits::BitError;
///
/// let err = BitError::OutOfRange { position: 8, requested: 16, available: 16 };
/// assert!(err.to_string().contains("out of range"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    #[error("read out of range: {requested} bits at bit {position}, buffer holds {available} bits")]
    OutOfRange {
        position: usize,
        requested: usize,
        available: usize,
    },
    #[error("seek out of range: bit {target}, buffer holds {available} bits")]
    SeekOutOfRange { target: i64, available: usize },
    #[error("unsigned read of {bits} bits exceeds 64")]
    WidthTooLarge { bits: usize },
    #[error("hex read of {bits} bits is not a whole number of nibbles")]
    InvalidHexWidth { bits: usize },
}

impl BitError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::OutOfRange
    }
}
