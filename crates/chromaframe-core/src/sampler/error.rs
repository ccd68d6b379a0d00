use thiserror::Error;

use crate::error::FailureKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("pixel width must be non-zero")]
    ZeroPixelWidth,
    #[error("pixel ({x}, {y}) outside {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl SampleError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::OutOfRange
    }
}
