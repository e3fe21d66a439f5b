use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use palette::Srgb;

use crate::color::Color;
use crate::error::{Error, Result};

/// A flat, row-major sequence of colors indexed by `y * width + x`.
///
/// Decoupled from any rendering surface so every stage can run headless.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(Error::DimensionMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from any decoded image. Alpha is dropped.
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let pixels = img
            .to_rgb8()
            .pixels()
            .map(|p| Srgb::new(p[0], p[1], p[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(Error::Decode)?;
        Self::from_image(&img)
    }

    /// Shrink proportionally so the width is at most `max_width`.
    /// Images already narrow enough are returned unchanged.
    pub fn fit_width(self, max_width: u32) -> Self {
        if max_width == 0 || self.width <= max_width {
            return self;
        }
        let scale = max_width as f64 / self.width as f64;
        let out_w = ((self.width as f64 * scale) as u32).max(1);
        let out_h = ((self.height as f64 * scale) as u32).max(1);
        let resized = image::imageops::resize(&self.to_rgb_image(), out_w, out_h, FilterType::Triangle);
        let pixels = resized.pixels().map(|p| Srgb::new(p[0], p[1], p[2])).collect();
        Self {
            width: out_w,
            height: out_h,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let raw = self
            .pixels
            .iter()
            .flat_map(|c| [c.red, c.green, c.blue])
            .collect();
        // Length is width * height * 3 by construction.
        RgbImage::from_raw(self.width, self.height, raw).unwrap_or_default()
    }
}
