use palette::Srgb;

/// An 8-bit RGB triple. Treated as a point in 3-D space for clustering.
pub type Color = Srgb<u8>;

pub const WHITE: Color = Srgb::new(255, 255, 255);
pub const BLACK: Color = Srgb::new(0, 0, 0);

/// Brightness above which a color counts as light (0..=255 scale).
pub const LIGHT_THRESHOLD: f32 = 128.0;

/// Squared Euclidean distance in RGB space.
#[inline(always)]
pub fn distance_sq(a: Color, b: Color) -> i32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    dr * dr + dg * dg + db * db
}

/// Perceptual brightness with Rec. 601 luma weights, on a 0..=255 scale.
#[inline]
pub fn brightness(c: Color) -> f32 {
    (c.red as u32 * 299 + c.green as u32 * 587 + c.blue as u32 * 114) as f32 / 1000.0
}

pub fn is_light(c: Color) -> bool {
    brightness(c) > LIGHT_THRESHOLD
}

/// `#RRGGBB`
pub fn to_hex(c: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

pub(crate) fn gray(value: u8) -> Color {
    Srgb::new(value, value, value)
}
