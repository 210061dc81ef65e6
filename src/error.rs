use alloc::string::String;

/// Errors from building surfaces, pixel formats, and conversions.
///
/// Per-pixel operations never fail; only descriptor validation and
/// allocation bookkeeping report errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SurfaceError {
    #[error("unsupported depth: {0} bits per pixel")]
    UnsupportedDepth(u32),

    #[error("invalid channel mask {mask:#010x}: {reason}")]
    InvalidMask { mask: u32, reason: &'static str },

    #[error("channel masks overlap: {0:#010x}")]
    OverlappingMasks(u32),

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("pitch {pitch} is smaller than a {width}-pixel row of {bytes_per_pixel}-byte pixels")]
    InvalidPitch {
        pitch: usize,
        width: u32,
        bytes_per_pixel: usize,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}
