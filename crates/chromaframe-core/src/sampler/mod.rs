//! Block sampling over decoded frames.
//!
//! `grid` defines the read-only pixel accessor supplied by the frame source;
//! `sample` turns one block's square of pixels into a single averaged color.

pub mod error;
pub mod grid;
pub mod sample;

pub use error::SampleError;
pub use grid::{PixelGrid, Rgb, RgbImage};
pub use sample::{SampleRegion, sample_block};
