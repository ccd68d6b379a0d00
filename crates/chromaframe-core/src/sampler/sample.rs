use super::error::SampleError;
use super::grid::{PixelGrid, Rgb};

/// Blocks narrower than this are sampled edge to edge.
pub const MIN_TRIMMED_PIXEL_WIDTH: usize = 5;

/// Inclusive pixel rectangle read for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub x_start: usize,
    pub y_start: usize,
    pub x_end: usize,
    pub y_end: usize,
}

impl SampleRegion {
    /// Region for the block at (`block_column`, `block_row`).
    ///
    /// Narrow blocks cover their whole square. Wider blocks start a quarter
    /// of the pixel width inside the square and span half of it, matching the
    /// margin reserved by the encoder.
    pub fn for_block(
        pixel_width: usize,
        block_column: usize,
        block_row: usize,
    ) -> Result<Self, SampleError> {
        if pixel_width == 0 {
            return Err(SampleError::ZeroPixelWidth);
        }
        let overflow = SampleError::OutOfBounds {
            x: usize::MAX,
            y: usize::MAX,
            width: 0,
            height: 0,
        };
        let origin_x = block_column
            .checked_mul(pixel_width)
            .ok_or_else(|| overflow.clone())?;
        let origin_y = block_row
            .checked_mul(pixel_width)
            .ok_or_else(|| overflow.clone())?;

        let (inset, span) = if pixel_width < MIN_TRIMMED_PIXEL_WIDTH {
            (0, pixel_width - 1)
        } else {
            (pixel_width / 4, pixel_width / 2)
        };
        let x_start = origin_x.checked_add(inset).ok_or_else(|| overflow.clone())?;
        let y_start = origin_y.checked_add(inset).ok_or_else(|| overflow.clone())?;
        Ok(Self {
            x_start,
            y_start,
            x_end: x_start.checked_add(span).ok_or_else(|| overflow.clone())?,
            y_end: y_start.checked_add(span).ok_or(overflow)?,
        })
    }

    pub fn pixel_count(&self) -> usize {
        (self.x_end - self.x_start + 1) * (self.y_end - self.y_start + 1)
    }
}

/// Average the sampled pixels of one block into a quantized color.
///
/// # Examples
/// ```
/// use chromaframe_core::{Rgb, RgbImage, sample_block};
///
/// let image = RgbImage::new(8, 8, Rgb::new(10, 20, 30));
/// let color = sample_block(&image, 4, 1, 1).unwrap();
/// assert_eq!(color, Rgb::new(10, 20, 30));
/// ```
///
/// # Errors
/// Returns `SampleError` when the pixel width is zero or the block reaches
/// outside the grid.
pub fn sample_block<G: PixelGrid + ?Sized>(
    grid: &G,
    pixel_width: usize,
    block_column: usize,
    block_row: usize,
) -> Result<Rgb, SampleError> {
    let region = SampleRegion::for_block(pixel_width, block_column, block_row)?;
    let (width, height) = (grid.width(), grid.height());
    if region.x_end >= width || region.y_end >= height {
        return Err(SampleError::OutOfBounds {
            x: region.x_end,
            y: region.y_end,
            width,
            height,
        });
    }

    let mut sums = [0u64; 3];
    for y in region.y_start..=region.y_end {
        for x in region.x_start..=region.x_end {
            let pixel = grid.pixel(x, y).ok_or(SampleError::OutOfBounds {
                x,
                y,
                width,
                height,
            })?;
            sums[0] += u64::from(pixel.r);
            sums[1] += u64::from(pixel.g);
            sums[2] += u64::from(pixel.b);
        }
    }

    let count = region.pixel_count() as u64;
    Ok(Rgb::new(
        mean_channel(sums[0], count),
        mean_channel(sums[1], count),
        mean_channel(sums[2], count),
    ))
}

/// Integer mean rounded to nearest, ties to even.
fn mean_channel(sum: u64, count: u64) -> u8 {
    let quotient = sum / count;
    let twice_remainder = (sum % count) * 2;
    let rounded = if twice_remainder > count || (twice_remainder == count && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(u64::from(u8::MAX)) as u8
}
