//! A tiny bold bitmap face covering the digits, which is all the overlay
//! ever draws.

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Blank columns between two glyphs.
pub const GLYPH_SPACING: u32 = 1;

// One byte per row, the low five bits are the columns (MSB = leftmost).
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110], // 0
    [0b00110, 0b01110, 0b11110, 0b00110, 0b00110, 0b00110, 0b11111], // 1
    [0b01110, 0b11011, 0b00011, 0b00110, 0b01100, 0b11000, 0b11111], // 2
    [0b11110, 0b00011, 0b00011, 0b01110, 0b00011, 0b00011, 0b11110], // 3
    [0b00110, 0b01110, 0b11110, 0b10110, 0b11111, 0b00110, 0b00110], // 4
    [0b11111, 0b11000, 0b11110, 0b00011, 0b00011, 0b11011, 0b01110], // 5
    [0b01110, 0b11000, 0b11110, 0b11011, 0b11011, 0b11011, 0b01110], // 6
    [0b11111, 0b00011, 0b00110, 0b00110, 0b01100, 0b01100, 0b01100], // 7
    [0b01110, 0b11011, 0b11011, 0b01110, 0b11011, 0b11011, 0b01110], // 8
    [0b01110, 0b11011, 0b11011, 0b01111, 0b00011, 0b00011, 0b01110], // 9
];

/// Whether the glyph for `digit` covers cell (`col`, `row`).
/// Non-digits and out-of-range cells are blank.
pub fn covers(digit: char, col: u32, row: u32) -> bool {
    let Some(d) = digit.to_digit(10) else {
        return false;
    };
    if col >= GLYPH_WIDTH || row >= GLYPH_HEIGHT {
        return false;
    }
    DIGITS[d as usize][row as usize] & (1 << (GLYPH_WIDTH - 1 - col)) != 0
}

/// Cell dimensions of `text` laid out on one line.
pub fn text_cells(text: &str) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    (n * GLYPH_WIDTH + (n - 1) * GLYPH_SPACING, GLYPH_HEIGHT)
}

/// Rasterize `text` into a row-major coverage mask of `text_cells(text)` cells.
pub fn rasterize(text: &str) -> Vec<bool> {
    let (w, h) = text_cells(text);
    let mut mask = vec![false; (w * h) as usize];
    for (i, ch) in text.chars().enumerate() {
        let x0 = i as u32 * (GLYPH_WIDTH + GLYPH_SPACING);
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if covers(ch, col, row) {
                    mask[(row * w + x0 + col) as usize] = true;
                }
            }
        }
    }
    mask
}
