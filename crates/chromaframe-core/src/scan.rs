//! Block scanning: sampled block colors mapped to palette symbols.

use thiserror::Error;

use crate::bits::BitBuffer;
use crate::error::FailureKind;
use crate::geometry::BlockGeometry;
use crate::palette::Palette;
use crate::sampler::{PixelGrid, SampleError, sample_block};

/// Where blocks sit in the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLayout {
    pub geometry: BlockGeometry,
    /// Edge length of one block, in pixels.
    pub pixel_width: usize,
}

impl ScanLayout {
    pub fn new(geometry: BlockGeometry, pixel_width: usize) -> Self {
        Self {
            geometry,
            pixel_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("block {index} is outside the {capacity}-block grid")]
    BlockOutOfGrid { index: usize, capacity: usize },
    #[error(transparent)]
    Sample(#[from] SampleError),
}

impl ScanError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::OutOfRange
    }
}

/// Scan `count` blocks starting at `first_block` into a symbol bitstream.
///
/// Blocks are numbered row-major across `layout.geometry.block_width`
/// columns. Each symbol is appended MSB-first using the palette's bit width.
///
/// # Examples
/// ```
/// use chromaframe_core::{BlockGeometry, DefaultPalettes, Rgb, RgbImage, ScanLayout, scan_blocks};
///
/// let mut image = RgbImage::new(8, 4, Rgb::new(0, 0, 0));
/// image.fill_rect(4, 0, 4, 4, Rgb::new(255, 255, 255));
/// let palette = DefaultPalettes::builtin().get(0).unwrap();
/// let layout = ScanLayout::new(BlockGeometry::new(1, 2), 4);
///
/// let bits = scan_blocks(&image, layout, &palette, 0, 2).unwrap();
/// assert_eq!(bits.len(), 2);
/// assert_eq!(bits.get(0), Some(false));
/// assert_eq!(bits.get(1), Some(true));
/// ```
///
/// # Errors
/// `BlockOutOfGrid` when the range runs past the block grid; sampler failures
/// propagate as `Sample`.
pub fn scan_blocks<G: PixelGrid + ?Sized>(
    grid: &G,
    layout: ScanLayout,
    palette: &Palette,
    first_block: usize,
    count: usize,
) -> Result<BitBuffer, ScanError> {
    let capacity = layout.geometry.block_count();
    if count == 0 {
        return Ok(BitBuffer::new());
    }
    let last = first_block.checked_add(count - 1).unwrap_or(usize::MAX);
    if last >= capacity {
        tracing::warn!(index = last, capacity, "block range exceeds the grid");
        return Err(ScanError::BlockOutOfGrid {
            index: last,
            capacity,
        });
    }

    let columns = usize::from(layout.geometry.block_width);
    let width = palette.bit_width();
    let mut bits = BitBuffer::with_capacity(count.saturating_mul(usize::from(width)));
    for index in first_block..=last {
        let color = sample_block(grid, layout.pixel_width, index % columns, index / columns)?;
        bits.push_uint(u64::from(palette.nearest_symbol(&color)), width);
    }
    tracing::debug!(first_block, count, bits = bits.len(), "blocks scanned");
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::{ScanError, ScanLayout, scan_blocks};
    use crate::geometry::BlockGeometry;
    use crate::palette::DefaultPalettes;
    use crate::sampler::{Rgb, RgbImage, SampleError};

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn four_color_image() -> RgbImage {
        // 2x2 blocks of 6 pixels: black, red / green, blue.
        let mut image = RgbImage::new(12, 12, Rgb::new(0, 0, 0));
        image.fill_rect(6, 0, 6, 6, RED);
        image.fill_rect(0, 6, 6, 6, GREEN);
        image.fill_rect(6, 6, 6, 6, BLUE);
        image
    }

    #[test]
    fn scans_row_major_with_palette_width() {
        let palette = DefaultPalettes::builtin().get(1).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(2, 2), 6);
        let bits = scan_blocks(&four_color_image(), layout, &palette, 0, 4).unwrap();
        assert_eq!(bits.len(), 8);
        assert_eq!(bits.as_bytes(), &[0b0001_1011]);
    }

    #[test]
    fn starts_at_first_block() {
        let palette = DefaultPalettes::builtin().get(1).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(2, 2), 6);
        let bits = scan_blocks(&four_color_image(), layout, &palette, 2, 2).unwrap();
        assert_eq!(bits.len(), 4);
        assert_eq!(bits.as_bytes(), &[0b1011_0000]);
    }

    #[test]
    fn noisy_colors_snap_to_nearest_symbol() {
        let mut image = RgbImage::new(6, 6, Rgb::new(230, 30, 20));
        image.set(0, 0, Rgb::new(0, 0, 0));
        let palette = DefaultPalettes::builtin().get(1).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(1, 1), 6);
        let bits = scan_blocks(&image, layout, &palette, 0, 1).unwrap();
        assert_eq!(bits.as_bytes(), &[0b0100_0000]);
    }

    #[test]
    fn empty_range_yields_empty_buffer() {
        let palette = DefaultPalettes::builtin().get(0).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(0, 0), 4);
        let bits = scan_blocks(&RgbImage::new(1, 1, RED), layout, &palette, 0, 0).unwrap();
        assert!(bits.is_empty());
    }

    #[test]
    fn range_past_grid_is_rejected() {
        let palette = DefaultPalettes::builtin().get(0).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(2, 2), 6);
        let err = scan_blocks(&four_color_image(), layout, &palette, 3, 2).unwrap_err();
        assert_eq!(
            err,
            ScanError::BlockOutOfGrid {
                index: 4,
                capacity: 4
            }
        );
    }

    #[test]
    fn grid_smaller_than_geometry_surfaces_sampler_error() {
        let palette = DefaultPalettes::builtin().get(0).unwrap();
        let layout = ScanLayout::new(BlockGeometry::new(4, 4), 6);
        let err = scan_blocks(&four_color_image(), layout, &palette, 0, 16).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Sample(SampleError::OutOfBounds { .. })
        ));
    }
}
