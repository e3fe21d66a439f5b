//! Color quantization: k-means in RGB space over a strided sample of the image.
//!
//! Centroids are seeded by uniform random draws (with replacement) from the
//! sample set and refined for a fixed number of Lloyd rounds. There is no
//! convergence check: the iteration count is a tuning knob, which keeps the
//! cost of a run bounded regardless of the input.

use std::str::FromStr;

use palette::Srgb;
use rand::Rng;

use crate::buffer::PixelBuffer;
use crate::color::{self, Color};
use crate::error::{Error, Result};

/// Tuning parameters of the quantizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Upper bound on the number of pixels fed to the clustering.
    pub sample_cap: usize,
    /// Number of assignment/update rounds.
    pub iterations: usize,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            sample_cap: 10_000,
            iterations: 10,
        }
    }
}

/// How palette entries are numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteOrder {
    /// Keep the order the centroids were seeded in.
    #[default]
    Clustered,
    /// Darkest color first, so paint number 1 is the darkest.
    Brightness,
}

impl FromStr for PaletteOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clustered" | "none" => Ok(Self::Clustered),
            "brightness" | "dark-first" => Ok(Self::Brightness),
            other => Err(format!("unknown palette order `{other}` (expected clustered or brightness)")),
        }
    }
}

/// The K representative colors. Index `i` is painted as number `i + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// 1-based paint number of a palette index.
    pub fn paint_number(index: usize) -> usize {
        index + 1
    }

    /// `(paint number, color)` pairs for display as a legend.
    pub fn legend(&self) -> Vec<(usize, Color)> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (Self::paint_number(i), c))
            .collect()
    }

    /// Index of the nearest entry; ties go to the lowest index.
    #[inline]
    pub fn nearest(&self, c: Color) -> usize {
        let mut best_idx = 0;
        let mut best_dist = i32::MAX;
        for (idx, &p) in self.colors.iter().enumerate() {
            let dist = color::distance_sq(c, p);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        best_idx
    }

    pub fn ordered(mut self, order: PaletteOrder) -> Self {
        if order == PaletteOrder::Brightness {
            self.colors
                .sort_by(|a, b| color::brightness(*a).total_cmp(&color::brightness(*b)));
        }
        self
    }

    /// Evenly spaced gray shades, one per entry, ranked by brightness:
    /// the darkest entry gets black and the lightest white.
    pub fn grayscale_shades(&self) -> Vec<Color> {
        let k = self.colors.len();
        if k <= 1 {
            return vec![color::WHITE; k];
        }
        let mut ranked: Vec<usize> = (0..k).collect();
        ranked.sort_by(|&a, &b| {
            color::brightness(self.colors[a]).total_cmp(&color::brightness(self.colors[b]))
        });
        let step = 255.0 / (k - 1) as f32;
        let mut shades = vec![color::BLACK; k];
        for (rank, &idx) in ranked.iter().enumerate() {
            shades[idx] = color::gray((rank as f32 * step).round() as u8);
        }
        shades
    }
}

type Point = [f32; 3];

#[inline(always)]
fn to_point(c: Color) -> Point {
    [c.red as f32, c.green as f32, c.blue as f32]
}

#[inline(always)]
fn to_color(p: Point) -> Color {
    let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(p[0]), channel(p[1]), channel(p[2]))
}

#[inline(always)]
fn point_distance_sq(a: Point, b: Point) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Every `stride`-th pixel, with the stride chosen so at most `cap` survive.
pub fn sample(pixels: &[Color], cap: usize) -> Vec<Color> {
    let stride = pixels.len().div_ceil(cap.max(1)).max(1);
    pixels.iter().step_by(stride).copied().collect()
}

/// One assignment + update round. Empty clusters keep their centroid.
fn lloyd_step(samples: &[Point], centroids: &[Point]) -> Vec<Point> {
    let k = centroids.len();
    let mut sums = vec![[0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for &s in samples {
        let mut closest = 0;
        let mut min_dist = f32::INFINITY;
        for (j, &c) in centroids.iter().enumerate() {
            let dist = point_distance_sq(s, c);
            if dist < min_dist {
                min_dist = dist;
                closest = j;
            }
        }
        counts[closest] += 1;
        for ch in 0..3 {
            sums[closest][ch] += s[ch] as f64;
        }
    }

    centroids
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(&old, (sum, &count))| {
            if count == 0 {
                old
            } else {
                let n = count as f64;
                [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
            }
        })
        .collect()
}

/// Reduce `buffer` to exactly `k` representative colors.
///
/// Entries come back in seeding order and may repeat when the image has
/// fewer than `k` distinct colors.
pub fn quantize<R: Rng>(
    buffer: &PixelBuffer,
    k: usize,
    options: &QuantizeOptions,
    rng: &mut R,
) -> Result<Palette> {
    if k == 0 {
        return Err(Error::InvalidPaletteSize(k));
    }
    let samples: Vec<Point> = sample(buffer.pixels(), options.sample_cap)
        .into_iter()
        .map(to_point)
        .collect();
    if samples.is_empty() {
        return Err(Error::EmptyImage {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let mut centroids: Vec<Point> = (0..k)
        .map(|_| samples[rng.random_range(0..samples.len())])
        .collect();

    for _ in 0..options.iterations {
        centroids = lloyd_step(&samples, &centroids);
    }

    log::debug!(
        "quantized {} samples into {} colors over {} rounds",
        samples.len(),
        k,
        options.iterations
    );
    Ok(Palette::new(centroids.into_iter().map(to_color).collect()))
}
