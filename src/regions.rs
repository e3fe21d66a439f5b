//! Region discovery: connected same-label components found by flood fill
//! from a sparse grid of seed points.
//!
//! A single visitation bitmap lives for the duration of one
//! [`discover_regions`] call and is shared by every fill in it, so no pixel
//! is ever counted twice and total fill work is bounded by the image size.

use crate::classify::LabelMap;

/// Where the number of a region is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// The grid point the fill started from.
    #[default]
    Seed,
    /// Mean position of the filled pixels.
    Centroid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionOptions {
    /// Smallest distance between grid seed points.
    pub min_grid_step: u32,
    /// The grid step is `min(width, height) / grid_divisions` when that is larger.
    pub grid_divisions: u32,
    /// Hard cap on pixels claimed by one fill.
    pub max_region_size: usize,
    /// A region must claim strictly more pixels than this to be emitted.
    pub min_region_size: usize,
    pub placement: Placement,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            min_grid_step: 20,
            grid_divisions: 20,
            max_region_size: 10_000,
            min_region_size: 100,
            placement: Placement::Seed,
        }
    }
}

impl RegionOptions {
    pub fn grid_step(&self, width: u32, height: u32) -> u32 {
        let proportional = width.min(height) / self.grid_divisions.max(1);
        self.min_grid_step.max(proportional).max(1)
    }
}

/// A numbered area of the artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub palette_index: usize,
    pub x: u32,
    pub y: u32,
    /// Pixels claimed by the fill (capped at `max_region_size`).
    pub size: usize,
}

impl Region {
    pub fn paint_number(&self) -> usize {
        self.palette_index + 1
    }
}

struct Fill {
    size: usize,
    sum_x: u64,
    sum_y: u64,
}

/// 4-connected, stack-based fill over pixels sharing the seed's label.
/// Stops claiming once `cap` pixels are marked.
fn flood_fill(labels: &LabelMap, visited: &mut [bool], start_x: u32, start_y: u32, cap: usize) -> Fill {
    let w = labels.width() as usize;
    let h = labels.height() as usize;
    let cells = labels.labels();
    let start = start_y as usize * w + start_x as usize;
    let target = cells[start];

    let mut fill = Fill {
        size: 0,
        sum_x: 0,
        sum_y: 0,
    };
    if cap == 0 || visited[start] {
        return fill;
    }

    visited[start] = true;
    fill.size = 1;
    fill.sum_x = start_x as u64;
    fill.sum_y = start_y as u64;
    let mut stack = vec![start];

    'fill: while let Some(idx) = stack.pop() {
        let x = idx % w;
        let y = idx / w;
        let neighbors = [
            (x + 1 < w).then(|| idx + 1),
            (x > 0).then(|| idx - 1),
            (y + 1 < h).then(|| idx + w),
            (y > 0).then(|| idx - w),
        ];
        for n in neighbors.into_iter().flatten() {
            if fill.size >= cap {
                break 'fill;
            }
            if !visited[n] && cells[n] == target {
                visited[n] = true;
                fill.size += 1;
                fill.sum_x += (n % w) as u64;
                fill.sum_y += (n / w) as u64;
                stack.push(n);
            }
        }
    }
    fill
}

/// Find regions worth numbering, in row-major grid order.
///
/// A color occupying several disjoint areas yields several regions. Areas
/// no larger than `min_region_size` are skipped, so the result may be empty.
pub fn discover_regions(labels: &LabelMap, options: &RegionOptions) -> Vec<Region> {
    let (width, height) = (labels.width(), labels.height());
    let step = options.grid_step(width, height) as usize;
    let mut visited = vec![false; labels.labels().len()];
    let mut regions = Vec::new();

    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            if visited[y as usize * width as usize + x as usize] {
                continue;
            }
            let fill = flood_fill(labels, &mut visited, x, y, options.max_region_size);
            if fill.size <= options.min_region_size {
                continue;
            }
            let (px, py) = match options.placement {
                Placement::Seed => (x, y),
                Placement::Centroid => (
                    (fill.sum_x / fill.size as u64) as u32,
                    (fill.sum_y / fill.size as u64) as u32,
                ),
            };
            regions.push(Region {
                palette_index: labels.get(x, y),
                x: px,
                y: py,
                size: fill.size,
            });
        }
    }

    log::debug!(
        "grid step {step}: {} regions over {}x{}",
        regions.len(),
        width,
        height
    );
    regions
}
