use thiserror::Error;

use crate::error::FailureKind;
use crate::sampler::Rgb;

use super::types::PaletteId;

/// Errors returned by palette construction and resolution.
///
/// # Examples
/// ```
/// use chromaframe_core::palette::{PaletteError, PaletteId};
///
/// let err = PaletteError::UnknownPalette { id: PaletteId::Default(37) };
/// assert!(err.to_string().contains("unknown palette"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unknown palette {id}")]
    UnknownPalette { id: PaletteId },
    #[error("palette needs a power-of-two color count of at least 2, got {count}")]
    InvalidColorCount { count: usize },
    #[error("palette repeats color {color}")]
    DuplicateColor { color: Rgb },
    #[error("default palette id {id} exceeds {max}")]
    DefaultIdOutOfRange { id: u8, max: u8 },
    #[error("palette {id} is not a custom palette")]
    NotCustom { id: PaletteId },
    #[error("palette {id} is not a default palette")]
    NotDefault { id: PaletteId },
    #[error("invalid custom palette id '{value}': expected 64 hex characters")]
    InvalidCustomId { value: String },
}

impl PaletteError {
    /// Construction errors describe malformed palette definitions and map to
    /// `OutOfRange`; lookups map to `UnknownPalette`.
    pub fn kind(&self) -> FailureKind {
        match self {
            PaletteError::UnknownPalette { .. } => FailureKind::UnknownPalette,
            _ => FailureKind::OutOfRange,
        }
    }
}
