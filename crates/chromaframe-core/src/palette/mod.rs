//! Color-to-symbol alphabets.
//!
//! A palette maps each quantized block color to a fixed-width symbol. Default
//! palettes are addressed by a small integer and live in a read-only table
//! built once per process (`builtin`). Custom palettes carry a 256-bit
//! identifier and are looked up through a caller-owned registry
//! (`registry`). `resolver` chooses between the two and reports unknown
//! palettes without guessing.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod types;

pub use builtin::DefaultPalettes;
pub use error::PaletteError;
pub use registry::{CustomPaletteLookup, CustomPalettes, UnknownPaletteRegistrar};
pub use resolver::{StreamPaletteRequest, resolve_header_palette, resolve_stream_palette};
pub use types::{CustomPaletteId, MAX_DEFAULT_PALETTE_ID, Palette, PaletteId, PaletteMetadata};
