//! Paint-by-numbers generator.
//!
//! Turns a raster image into a paint-by-numbers artwork:
//! 1. k-means in RGB space over a strided sample builds a K-color palette;
//! 2. every pixel is labelled with its nearest palette entry;
//! 3. a grid of flood fills finds connected regions big enough to number;
//! 4. the labels are painted (flat colors, grays or outlines) and each region
//!    gets its paint number drawn with a contrasting double stroke.
//!
//! The same pipeline is exported to JavaScript through `wasm-bindgen` and to
//! native callers through [`paint_by_numbers_bytes`].

use js_sys::{Array, Object, Reflect, Uint8Array};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

pub mod buffer;
pub mod classify;
pub mod color;
pub mod error;
mod font;
pub mod pipeline;
pub mod quantize;
pub mod regions;
pub mod render;
pub mod session;

pub use buffer::PixelBuffer;
pub use classify::{LabelMap, classify};
pub use color::Color;
pub use error::{Error, Result};
pub use pipeline::{Artwork, PipelineConfig, run, run_buffer, run_bytes};
pub use quantize::{Palette, PaletteOrder, QuantizeOptions, quantize};
pub use regions::{Placement, Region, RegionOptions, discover_regions};
pub use render::{RenderOptions, RenderStyle, render};
pub use session::{Outcome, Session, Ticket};

/// A seeded generator when `seed` is given, fresh entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

fn js_err(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_style(style: Option<String>) -> Result<RenderStyle, JsValue> {
    match style {
        Some(s) => s.parse().map_err(|e: String| JsValue::from_str(&e)),
        None => Ok(RenderStyle::default()),
    }
}

fn artwork_to_js(art: &Artwork) -> Result<Object, JsValue> {
    let image = art.to_png().map_err(js_err)?;
    let original = art.original_png().map_err(js_err)?;

    let palette_js = Array::new();
    for hex in art.palette_hex() {
        palette_js.push(&JsValue::from_str(&hex));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(image.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("original"), &Uint8Array::from(original.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("width"), &JsValue::from(art.width()))?;
    Reflect::set(&result, &JsValue::from_str("height"), &JsValue::from(art.height()))?;
    Reflect::set(&result, &JsValue::from_str("regions"), &JsValue::from(art.regions.len() as u32))?;
    Ok(result)
}

/// Convert an encoded image into a paint-by-numbers artwork.
///
/// Returns `{ image, original, palette, width, height, regions }` where
/// `image` and `original` are PNG bytes and `palette` lists `#RRGGBB`
/// strings in paint-number order.
#[wasm_bindgen]
pub fn paint_by_numbers(
    input: Vec<u8>,
    n_colors: usize,
    style: Option<String>,
    seed: Option<u32>,
) -> Result<Object, JsValue> {
    let mut config = PipelineConfig {
        palette_size: n_colors,
        ..PipelineConfig::default()
    };
    config.render.style = parse_style(style)?;

    let mut rng = rng_from_seed(seed.map(u64::from));
    let art = run_bytes(&input, &config, &mut rng).map_err(js_err)?;
    artwork_to_js(&art)
}

/// Stateful wrapper for a page that re-renders whenever the image or the
/// color count changes. Keeps the last good artwork on failure.
#[wasm_bindgen]
pub struct Studio {
    session: Session,
}

#[wasm_bindgen]
impl Studio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Studio {
        Studio {
            session: Session::new(),
        }
    }

    pub fn render(&self, input: Vec<u8>, n_colors: usize, style: Option<String>) -> Result<Object, JsValue> {
        let mut config = PipelineConfig {
            palette_size: n_colors,
            ..PipelineConfig::default()
        };
        config.render.style = parse_style(style)?;

        match self.session.run(&input, &config, &mut rand::rng()) {
            Outcome::Shown(art) => artwork_to_js(&art),
            Outcome::Superseded => Err(JsValue::from_str("superseded by a newer run")),
            Outcome::Failed { error, .. } => Err(JsValue::from_str(&format!("processing failed: {error}"))),
        }
    }

    /// PNG bytes of the artwork currently on display.
    pub fn download(&self) -> Result<Uint8Array, JsValue> {
        let art = self
            .session
            .current()
            .ok_or_else(|| JsValue::from_str("nothing rendered yet"))?;
        let png = art.to_png().map_err(js_err)?;
        Ok(Uint8Array::from(png.as_slice()))
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------
// Native API
// ------------------------------------------------------------

/// Decode `input`, run the pipeline and return the PNG-encoded artwork
/// together with its legend.
#[cfg(not(target_arch = "wasm32"))]
pub fn paint_by_numbers_bytes(
    input: &[u8],
    config: &PipelineConfig,
    seed: Option<u64>,
) -> Result<(Vec<u8>, Vec<(usize, Color)>)> {
    let mut rng = rng_from_seed(seed);
    let art = run_bytes(input, config, &mut rng)?;
    Ok((art.to_png()?, art.legend()))
}
