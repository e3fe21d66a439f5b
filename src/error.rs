use thiserror::Error;

/// Errors produced while turning an image into a paint-by-numbers artwork.
#[derive(Debug, Error)]
pub enum Error {
    /// The input bytes could not be decoded as an image.
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The rendered artwork could not be encoded.
    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("palette size must be at least 1, got {0}")]
    InvalidPaletteSize(usize),

    #[error("buffer holds {actual} entries, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
