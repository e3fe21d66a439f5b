//! The whole image-to-artwork pass:
//! pixels → palette → label map → regions → rendered canvas.
//!
//! Each run is a pure function of the image, the configuration and the
//! random source; nothing is cached between runs.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use log::{debug, info};
use rand::Rng;

use crate::buffer::PixelBuffer;
use crate::classify::{LabelMap, classify};
use crate::color::{self, Color};
use crate::error::{Error, Result};
use crate::quantize::{Palette, PaletteOrder, QuantizeOptions, quantize};
use crate::regions::{Region, RegionOptions, discover_regions};
use crate::render::{RenderOptions, render};

/// Width the browser canvas is capped at.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of paint colors (K).
    pub palette_size: usize,
    /// Downscale wider inputs to this width first.
    pub max_width: Option<u32>,
    pub quantize: QuantizeOptions,
    pub order: PaletteOrder,
    pub regions: RegionOptions,
    pub render: RenderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette_size: 8,
            max_width: Some(DEFAULT_MAX_WIDTH),
            quantize: QuantizeOptions::default(),
            order: PaletteOrder::default(),
            regions: RegionOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct Artwork {
    /// The input at processing size, for side-by-side display.
    pub original: RgbImage,
    /// Quantized (or outlined) canvas with the number overlay.
    pub rendered: RgbImage,
    pub palette: Palette,
    pub labels: LabelMap,
    pub regions: Vec<Region>,
}

impl Artwork {
    pub fn width(&self) -> u32 {
        self.rendered.width()
    }

    pub fn height(&self) -> u32 {
        self.rendered.height()
    }

    pub fn legend(&self) -> Vec<(usize, Color)> {
        self.palette.legend()
    }

    pub fn palette_hex(&self) -> Vec<String> {
        self.palette.colors().iter().map(|&c| color::to_hex(c)).collect()
    }

    /// PNG bytes of exactly what was rendered.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.rendered)
    }

    pub fn original_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.original)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.rendered
            .save_with_format(path, ImageFormat::Png)
            .map_err(Error::Encode)
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(buf)
}

/// Run every stage on an in-memory buffer.
pub fn run_buffer<R: Rng>(buffer: PixelBuffer, config: &PipelineConfig, rng: &mut R) -> Result<Artwork> {
    let buffer = match config.max_width {
        Some(max) => buffer.fit_width(max),
        None => buffer,
    };
    info!(
        "paint-by-numbers: {}x{}, {} colors",
        buffer.width(),
        buffer.height(),
        config.palette_size
    );

    let palette = quantize(&buffer, config.palette_size, &config.quantize, rng)?.ordered(config.order);
    debug!("palette: {:?}", palette.colors().iter().map(|&c| color::to_hex(c)).collect::<Vec<_>>());

    let labels = classify(&buffer, &palette);
    let regions = discover_regions(&labels, &config.regions);
    debug!("{} numbered regions", regions.len());

    let rendered = render(&labels, &palette, &regions, &config.render);
    info!("paint-by-numbers: done, {} regions", regions.len());

    Ok(Artwork {
        original: buffer.to_rgb_image(),
        rendered,
        palette,
        labels,
        regions,
    })
}

/// Run every stage on a decoded image.
pub fn run<R: Rng>(image: &DynamicImage, config: &PipelineConfig, rng: &mut R) -> Result<Artwork> {
    run_buffer(PixelBuffer::from_image(image)?, config, rng)
}

/// Decode `bytes` and run. A decode failure returns before any stage starts.
pub fn run_bytes<R: Rng>(bytes: &[u8], config: &PipelineConfig, rng: &mut R) -> Result<Artwork> {
    run_buffer(PixelBuffer::decode(bytes)?, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn split_buffer(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..height)
            .flat_map(|_| {
                (0..width).map(move |x| {
                    if x < width / 2 {
                        Srgb::new(240, 220, 40)
                    } else {
                        Srgb::new(30, 30, 90)
                    }
                })
            })
            .collect();
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn labels_stay_inside_palette() {
        let config = PipelineConfig {
            palette_size: 4,
            ..PipelineConfig::default()
        };
        let art = run_buffer(split_buffer(64, 48), &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(art.palette.len(), 4);
        assert!(art.labels.labels().iter().all(|&l| l < 4));
        assert_eq!((art.width(), art.height()), (64, 48));
        assert_eq!(art.original.dimensions(), art.rendered.dimensions());
    }

    #[test]
    fn two_halves_get_two_numbers() {
        let config = PipelineConfig {
            palette_size: 2,
            ..PipelineConfig::default()
        };
        let art = run_buffer(split_buffer(80, 60), &config, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(art.regions.len(), 2);
        let numbers: Vec<_> = art.regions.iter().map(|r| r.paint_number()).collect();
        assert!(numbers.contains(&1) && numbers.contains(&2));
    }

    #[test]
    fn wide_inputs_are_fitted() {
        let config = PipelineConfig {
            palette_size: 2,
            max_width: Some(40),
            ..PipelineConfig::default()
        };
        let art = run_buffer(split_buffer(80, 60), &config, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!((art.width(), art.height()), (40, 30));
        assert_eq!(art.original.dimensions(), (40, 30));
    }

    #[test]
    fn brightness_order_numbers_darkest_first() {
        let config = PipelineConfig {
            palette_size: 2,
            order: PaletteOrder::Brightness,
            ..PipelineConfig::default()
        };
        let art = run_buffer(split_buffer(80, 60), &config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(art.legend(), vec![(1, Srgb::new(30, 30, 90)), (2, Srgb::new(240, 220, 40))]);
        assert_eq!(art.palette_hex(), vec!["#1E1E5A", "#F0DC28"]);
    }

    #[test]
    fn png_export_matches_rendered_pixels() {
        let art = run_buffer(split_buffer(50, 50), &PipelineConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap();
        let png = art.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, art.rendered);
    }

    #[test]
    fn undecodable_bytes_fail_before_processing() {
        let result = run_bytes(&[0u8, 1, 2, 3], &PipelineConfig::default(), &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
