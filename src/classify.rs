use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::quantize::Palette;

/// One palette index per pixel, row-major, same dimensions as the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<usize>,
}

impl LabelMap {
    pub fn new(width: u32, height: u32, labels: Vec<usize>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        if labels.len() != width as usize * height as usize {
            return Err(Error::DimensionMismatch {
                width,
                height,
                actual: labels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> usize {
        self.labels[y as usize * self.width as usize + x as usize]
    }
}

/// Label every pixel with its nearest palette entry at full resolution.
///
/// Deterministic for fixed inputs. Costs `O(width * height * K)`.
pub fn classify(buffer: &PixelBuffer, palette: &Palette) -> LabelMap {
    let labels = buffer.pixels().iter().map(|&c| palette.nearest(c)).collect();
    LabelMap {
        width: buffer.width(),
        height: buffer.height(),
        labels,
    }
}
