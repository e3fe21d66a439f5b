//! Compositing the label map into a visible artwork with a number overlay.

use std::str::FromStr;

use image::{Rgb, RgbImage};

use crate::classify::LabelMap;
use crate::color::{self, Color};
use crate::font;
use crate::quantize::Palette;
use crate::regions::Region;

/// What the artwork looks like underneath the numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Every pixel painted with its palette color.
    #[default]
    Filled,
    /// White canvas with black one-pixel borders between labels.
    Outline,
    /// Palette colors replaced by evenly spaced grays ranked by brightness.
    Grayscale,
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filled" | "color" => Ok(Self::Filled),
            "outline" | "borders" => Ok(Self::Outline),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(Self::Grayscale),
            other => Err(format!("unknown render style `{other}` (expected filled, outline or grayscale)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub style: RenderStyle,
    /// Draw paint numbers on top.
    pub numbers: bool,
    /// Output pixels per glyph cell.
    pub glyph_scale: u32,
    /// Radius of the outer halo around each number, in output pixels.
    pub halo: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: RenderStyle::Filled,
            numbers: true,
            glyph_scale: 2,
            halo: 2,
        }
    }
}

#[inline(always)]
fn rgb(c: Color) -> Rgb<u8> {
    Rgb([c.red, c.green, c.blue])
}

/// The color each palette index shows on the canvas for `style`.
pub fn display_colors(palette: &Palette, style: RenderStyle) -> Vec<Color> {
    match style {
        RenderStyle::Filled => palette.colors().to_vec(),
        RenderStyle::Outline => vec![color::WHITE; palette.len()],
        RenderStyle::Grayscale => palette.grayscale_shades(),
    }
}

pub fn render(labels: &LabelMap, palette: &Palette, regions: &[Region], options: &RenderOptions) -> RgbImage {
    let fills = display_colors(palette, options.style);
    let mut img = RgbImage::from_fn(labels.width(), labels.height(), |x, y| {
        // Labels index the palette; fall back to white rather than panic.
        rgb(fills.get(labels.get(x, y)).copied().unwrap_or(color::WHITE))
    });

    if options.style == RenderStyle::Outline {
        draw_borders(&mut img, labels, color::BLACK);
    }

    if options.numbers {
        for region in regions {
            let background = fills.get(region.palette_index).copied().unwrap_or(color::WHITE);
            draw_number(&mut img, region.paint_number(), region.x, region.y, background, options);
        }
    }
    img
}

/// Mark every pixel whose right or bottom neighbor has a different label.
///
/// The result is a one-pixel boundary network sitting on the left/top side
/// of each label change.
pub fn draw_borders(img: &mut RgbImage, labels: &LabelMap, ink: Color) {
    let (w, h) = (labels.width(), labels.height());
    for y in 0..h {
        for x in 0..w {
            let here = labels.get(x, y);
            let right = x + 1 < w && labels.get(x + 1, y) != here;
            let below = y + 1 < h && labels.get(x, y + 1) != here;
            if right || below {
                img.put_pixel(x, y, rgb(ink));
            }
        }
    }
}

/// Grow a coverage mask by a disc of radius `r`.
fn dilate(mask: &[bool], w: i64, h: i64, r: i64) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for y in 0..h {
        for x in 0..w {
            if !mask[(y * w + x) as usize] {
                continue;
            }
            for dy in -r..=r {
                for dx in -r..=r {
                    let (nx, ny) = (x + dx, y + dy);
                    if dx * dx + dy * dy <= r * r && nx >= 0 && ny >= 0 && nx < w && ny < h {
                        out[(ny * w + nx) as usize] = true;
                    }
                }
            }
        }
    }
    out
}

/// Draw `number` centered on (`cx`, `cy`) with a double stroke: a wide halo
/// in one tone, then a thin stroke and the fill in the opposite tone. Dark
/// text goes on light backgrounds and vice versa.
pub fn draw_number(img: &mut RgbImage, number: usize, cx: u32, cy: u32, background: Color, options: &RenderOptions) {
    let text = number.to_string();
    let (cells_w, cells_h) = font::text_cells(&text);
    let cells = font::rasterize(&text);
    let scale = options.glyph_scale.max(1) as i64;
    let pad = options.halo.max(1) as i64;

    let text_w = cells_w as i64 * scale;
    let text_h = cells_h as i64 * scale;
    let w = text_w + 2 * pad;
    let h = text_h + 2 * pad;

    let mut glyph = vec![false; (w * h) as usize];
    for y in 0..text_h {
        for x in 0..text_w {
            let cell = (y / scale) * cells_w as i64 + x / scale;
            if cells[cell as usize] {
                glyph[((y + pad) * w + x + pad) as usize] = true;
            }
        }
    }
    let halo = dilate(&glyph, w, h, options.halo as i64);
    let stroke = dilate(&glyph, w, h, 1);

    let (halo_ink, text_ink) = if color::is_light(background) {
        (color::WHITE, color::BLACK)
    } else {
        (color::BLACK, color::WHITE)
    };

    let ox = cx as i64 - text_w / 2 - pad;
    let oy = cy as i64 - text_h / 2 - pad;
    let (img_w, img_h) = (img.width() as i64, img.height() as i64);
    for (layer, ink) in [(&halo, halo_ink), (&stroke, text_ink), (&glyph, text_ink)] {
        for y in 0..h {
            for x in 0..w {
                let (px, py) = (ox + x, oy + y);
                if layer[(y * w + x) as usize] && px >= 0 && py >= 0 && px < img_w && py < img_h {
                    img.put_pixel(px as u32, py as u32, rgb(ink));
                }
            }
        }
    }
}
