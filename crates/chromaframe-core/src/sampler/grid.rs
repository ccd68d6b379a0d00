use serde::{Deserialize, Serialize};

use super::error::SampleError;

/// Quantized color reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn distance_squared(&self, other: &Rgb) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Read-only access to an already decoded frame.
pub trait PixelGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Pixel at column `x`, row `y`; `None` outside the grid.
    fn pixel(&self, x: usize, y: usize) -> Option<Rgb>;
}

/// Row-major in-memory frame.
///
/// # Examples
/// ```
/// use chromaframe_core::{PixelGrid, Rgb, RgbImage};
///
/// let mut image = RgbImage::new(4, 2, Rgb::new(0, 0, 0));
/// image.set(3, 1, Rgb::new(255, 0, 0));
/// assert_eq!(image.pixel(3, 1), Some(Rgb::new(255, 0, 0)));
/// assert_eq!(image.pixel(4, 1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RgbImage {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, SampleError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(SampleError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from packed `r, g, b` bytes, as produced by most image decoders.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, SampleError> {
        if bytes.len() != width * height * 3 {
            return Err(SampleError::DimensionMismatch {
                expected: width * height,
                actual: bytes.len() / 3,
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Write one pixel; coordinates outside the image are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: Rgb) {
        for row in y..y.saturating_add(height).min(self.height) {
            for column in x..x.saturating_add(width).min(self.width) {
                self.pixels[row * self.width + column] = color;
            }
        }
    }
}

impl PixelGrid for RgbImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Rgb, RgbImage};
    use crate::sampler::error::SampleError;

    #[test]
    fn from_rgb_bytes_checks_length() {
        let err = RgbImage::from_rgb_bytes(2, 2, &[0u8; 9]).unwrap_err();
        assert_eq!(
            err,
            SampleError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn fill_rect_clips_to_image() {
        use super::PixelGrid;

        let mut image = RgbImage::new(3, 3, Rgb::new(0, 0, 0));
        image.fill_rect(2, 2, 5, 5, Rgb::new(1, 2, 3));
        assert_eq!(image.pixel(2, 2), Some(Rgb::new(1, 2, 3)));
        assert_eq!(image.pixel(1, 2), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Rgb::new(255, 0, 16).to_string(), "#ff0010");
    }
}
