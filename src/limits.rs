//! Caps on surface size, checked before any pixel buffer is allocated.

use alloc::format;

use crate::error::SurfaceError;

/// Resource limits for surface allocation and conversion.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of one pixel buffer, row padding included.
    pub max_memory_bytes: Option<u64>,
}

/// Row stride and total length of a zeroed surface buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BufferSize {
    pub pitch: usize,
    pub len: usize,
}

impl Limits {
    /// Size the buffer of a `width` x `height` surface with 4-byte-aligned
    /// rows, refusing it if it overflows or falls outside these limits.
    pub(crate) fn check_surface(
        &self,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
    ) -> Result<BufferSize, SurfaceError> {
        let too_large = SurfaceError::DimensionsTooLarge { width, height };
        let exceeded = |what: &str, value: u64, limit: u64| {
            Err(SurfaceError::LimitExceeded(format!(
                "{what} {value} exceeds limit {limit}"
            )))
        };

        if let Some(max) = self.max_width.filter(|&max| width > max) {
            return exceeded("width", width.into(), max.into());
        }
        if let Some(max) = self.max_height.filter(|&max| height > max) {
            return exceeded("height", height.into(), max.into());
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels.filter(|&max| pixels > max) {
            return exceeded("pixel count", pixels, max);
        }

        let pitch = (width as usize)
            .checked_mul(bytes_per_pixel)
            .and_then(|row| row.checked_add(3))
            .map(|row| row & !3)
            .ok_or(too_large)?;
        let len = pitch
            .checked_mul(height as usize)
            .ok_or(SurfaceError::DimensionsTooLarge { width, height })?;
        if let Some(max) = self.max_memory_bytes.filter(|&max| len as u64 > max) {
            return exceeded("buffer of", len as u64, max);
        }
        Ok(BufferSize { pitch, len })
    }
}
