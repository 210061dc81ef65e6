//! Owned raster surfaces and per-pixel access through their format.

use alloc::vec;
use alloc::vec::Vec;

use rgb::RGBA8;

use crate::channels::{expanded_channels, map_rgba, raw_channels, set_raw_channels};
use crate::codec::{decode_pixel, encode_pixel};
use crate::error::SurfaceError;
use crate::format::{Palette, PixelFormat};
use crate::limits::{BufferSize, Limits};

/// An owned raster: `height` rows of `pitch` bytes in one buffer, described
/// by a [`PixelFormat`].
///
/// Invariants: `pitch >= width * bytes_per_pixel` and
/// `pixels.len() >= pitch * height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pitch: usize,
    pixels: Vec<u8>,
    format: PixelFormat,
}

impl Surface {
    /// Allocate a zeroed surface with a 4-byte-aligned pitch.
    ///
    /// Running out of memory aborts; only size overflow is reported.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, SurfaceError> {
        Self::with_limits(width, height, format, &Limits::default())
    }

    /// Like [`Surface::new`], refusing sizes outside `limits`.
    pub fn with_limits(
        width: u32,
        height: u32,
        format: PixelFormat,
        limits: &Limits,
    ) -> Result<Self, SurfaceError> {
        let BufferSize { pitch, len } =
            limits.check_surface(width, height, format.bytes_per_pixel())?;
        Ok(Self {
            width,
            height,
            pitch,
            pixels: vec![0u8; len],
            format,
        })
    }

    /// Adopt a pixel buffer produced elsewhere (an image loader, a scaler).
    pub fn from_raw(
        width: u32,
        height: u32,
        pitch: usize,
        pixels: Vec<u8>,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let bytes_per_pixel = format.bytes_per_pixel();
        let row = (width as usize)
            .checked_mul(bytes_per_pixel)
            .ok_or(SurfaceError::DimensionsTooLarge { width, height })?;
        if pitch < row {
            return Err(SurfaceError::InvalidPitch {
                pitch,
                width,
                bytes_per_pixel,
            });
        }
        let needed = pitch
            .checked_mul(height as usize)
            .ok_or(SurfaceError::DimensionsTooLarge { width, height })?;
        if pixels.len() < needed {
            return Err(SurfaceError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pitch,
            pixels,
            format,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including padding.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Release the buffer, e.g. to hand it to an uploader.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch;
        &self.pixels[start..start + self.row_bytes()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.pitch;
        let len = self.row_bytes();
        &mut self.pixels[start..start + len]
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// The palette of a paletted surface, editable in place. Pixels keep
    /// their indices, so edits take effect without reallocating.
    pub fn palette_mut(&mut self) -> Option<&mut Palette> {
        self.format.palette_mut()
    }

    pub fn color_key(&self) -> Option<u32> {
        self.format.color_key()
    }

    /// Enable (`Some`) or disable (`None`) color keying.
    pub fn set_color_key(&mut self, key: Option<u32>) {
        self.format.set_color_key(key);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.pitch + x as usize * self.format.bytes_per_pixel()
    }

    /// Raw pixel value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        decode_pixel(
            &self.pixels,
            self.offset(x, y),
            self.format.bytes_per_pixel(),
            self.format.byte_order(),
        )
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        let offset = self.offset(x, y);
        encode_pixel(
            &mut self.pixels,
            offset,
            self.format.bytes_per_pixel(),
            self.format.byte_order(),
            value,
        );
    }

    /// Native-range channels at `(x, y)`.
    pub fn raw_rgba(&self, x: u32, y: u32) -> RGBA8 {
        raw_channels(self.pixel(x, y), &self.format)
    }

    /// Full-range channels at `(x, y)`.
    pub fn rgba(&self, x: u32, y: u32) -> RGBA8 {
        expanded_channels(self.pixel(x, y), &self.format)
    }

    /// Store native-range channels at `(x, y)` (direct-color formats).
    pub fn set_raw_rgba(&mut self, x: u32, y: u32, v: RGBA8) {
        let value = set_raw_channels(&self.format, v);
        self.set_pixel(x, y, value);
    }

    /// Store full-range channels at `(x, y)`; paletted surfaces store the
    /// nearest palette index.
    pub fn set_rgba(&mut self, x: u32, y: u32, v: RGBA8) {
        let value = map_rgba(&self.format, v);
        self.set_pixel(x, y, value);
    }

    /// Set every pixel to `value`. Row padding is left untouched.
    pub fn fill(&mut self, value: u32) {
        if self.pitch == 0 {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let order = self.format.byte_order();
        let mut first = [0u8; 4];
        encode_pixel(&mut first, 0, bpp, order, value);
        let pattern = &first[..bpp];
        let row_bytes = self.row_bytes();
        for row in self.pixels.chunks_mut(self.pitch).take(self.height as usize) {
            for px in row[..row_bytes].chunks_exact_mut(bpp) {
                px.copy_from_slice(pattern);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb565() -> PixelFormat {
        PixelFormat::from_masks(16, [0xF800, 0x07E0, 0x001F, 0]).unwrap()
    }

    #[test]
    fn new_aligns_pitch() {
        let s = Surface::new(3, 2, PixelFormat::from_masks(24, [0xFF0000, 0xFF00, 0xFF, 0]).unwrap())
            .unwrap();
        assert_eq!(s.pitch(), 12);
        assert_eq!(s.pixels().len(), 24);
        assert!(s.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn from_raw_checks_invariants() {
        assert!(matches!(
            Surface::from_raw(4, 2, 7, vec![0; 16], rgb565()),
            Err(SurfaceError::InvalidPitch { pitch: 7, .. })
        ));
        assert!(matches!(
            Surface::from_raw(4, 2, 8, vec![0; 15], rgb565()),
            Err(SurfaceError::BufferTooSmall {
                needed: 16,
                actual: 15
            })
        ));
        assert!(Surface::from_raw(4, 2, 8, vec![0; 16], rgb565()).is_ok());
    }

    #[test]
    fn limits_reject_large_surfaces() {
        let limits = Limits {
            max_width: Some(16),
            ..Limits::default()
        };
        assert!(matches!(
            Surface::with_limits(17, 1, rgb565(), &limits),
            Err(SurfaceError::LimitExceeded(_))
        ));
    }

    #[test]
    fn pixel_access_respects_pitch() {
        let mut s = Surface::from_raw(2, 2, 6, vec![0xAA; 12], rgb565()).unwrap();
        s.set_pixel(1, 1, 0x1234);
        assert_eq!(s.pixel(1, 1), 0x1234);
        // Row padding stays as it was.
        assert_eq!(&s.pixels()[4..6], &[0xAA, 0xAA]);
        assert_eq!(s.row(1).len(), 4);
    }

    #[test]
    fn rgba_helpers() {
        let mut s = Surface::new(1, 1, rgb565()).unwrap();
        s.set_rgba(0, 0, RGBA8::new(255, 128, 8, 17));
        assert_eq!(s.rgba(0, 0), RGBA8::new(248, 128, 8, 255));
        s.set_raw_rgba(0, 0, RGBA8::new(1, 2, 3, 0));
        assert_eq!(s.raw_rgba(0, 0), RGBA8::new(1, 2, 3, 255));
    }

    #[test]
    fn fill_skips_padding() {
        let mut s = Surface::from_raw(1, 2, 4, vec![0; 8], rgb565()).unwrap();
        s.fill(0xBEEF);
        assert_eq!(s.pixel(0, 0), 0xBEEF);
        assert_eq!(s.pixel(0, 1), 0xBEEF);
        assert_eq!(&s.pixels()[2..4], &[0, 0]);
    }
}
