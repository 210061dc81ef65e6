//! Surface format conversion.
//!
//! [`convert_surface`] consumes a surface and returns one in the requested
//! depth and channel masks, keeping palette and color-key semantics. When
//! the layout already matches, the input comes back untouched.

use log::{debug, trace};

use crate::channels::{expanded_channels, map_rgba};
use crate::codec::native_mask;
use crate::error::SurfaceError;
use crate::format::PixelFormat;
use crate::limits::Limits;
use crate::surface::Surface;

/// Requested output of a conversion.
///
/// `masks` are `[R, G, B, A]` in little-endian convention: textures are
/// stored little-endian, so the masks are swapped to host order before the
/// target is created. On little-endian hosts this is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetFormat {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel: 8 (paletted), 15, 16, 24 or 32.
    pub depth: u32,
    pub masks: [u32; 4],
}

impl TargetFormat {
    pub fn new(width: u32, height: u32, depth: u32, masks: [u32; 4]) -> Self {
        Self {
            width,
            height,
            depth,
            masks,
        }
    }

    /// Target masks in host order.
    pub fn native_masks(&self) -> [u32; 4] {
        self.masks.map(|m| native_mask(self.depth, m))
    }

    /// The pixel format a converted surface will carry.
    pub fn pixel_format(&self) -> Result<PixelFormat, SurfaceError> {
        PixelFormat::from_masks(self.depth, self.native_masks())
    }
}

/// Convert `surface` to `target`, consuming it.
///
/// The returned surface is the only valid one afterwards. Errors come only
/// from an invalid target descriptor; running out of memory aborts.
pub fn convert_surface(surface: Surface, target: &TargetFormat) -> Result<Surface, SurfaceError> {
    convert_surface_with_limits(surface, target, &Limits::default())
}

/// Like [`convert_surface`], refusing targets outside `limits`.
pub fn convert_surface_with_limits(
    mut src: Surface,
    target: &TargetFormat,
    limits: &Limits,
) -> Result<Surface, SurfaceError> {
    let format = target.pixel_format()?;
    limits.check_surface(target.width, target.height, format.bytes_per_pixel())?;

    if src.width() == target.width
        && src.height() == target.height
        && src.format().same_layout(&format)
    {
        // A keyed paletted source is still copied so the key is carried
        // through explicitly.
        if !(src.color_key().is_some() && src.format().is_paletted()) {
            debug!(
                "convert: {}x{} already {}bpp {:08x?}, skipping copy",
                target.width, target.height, target.depth, format.masks()
            );
            return Ok(src);
        }
    }

    let mut dst = Surface::with_limits(target.width, target.height, format, limits)?;

    if let (Some(src_palette), Some(dst_palette)) = (src.format().palette(), dst.palette_mut()) {
        dst_palette.copy_from(src_palette);
    }

    if src.format().is_paletted() && dst.format().is_paletted() {
        if let Some(key) = src.color_key() {
            // Untouched target pixels default to transparent. A zeroed buffer
            // already holds index 0.
            if key != 0 {
                dst.fill(key);
            }
            dst.set_color_key(Some(key));
            src.set_color_key(None);
            debug!("convert: paletted color key {key} carried to target");
        }
    }

    let width = src.width().min(dst.width());
    let height = src.height().min(dst.height());
    debug!(
        "convert: {}x{} {}bpp -> {}x{} {}bpp, copying {width}x{height}",
        src.width(),
        src.height(),
        src.format().bits_per_pixel(),
        dst.width(),
        dst.height(),
        dst.format().bits_per_pixel()
    );
    blit(&src, &mut dst, width, height);
    Ok(dst)
}

/// Copy the top-left `width` x `height` pixels of `src` into `dst`,
/// reformatting each pixel. The copy is literal: no alpha compositing.
///
/// Pixels matching the source color key are not written. Between two
/// paletted surfaces indices are copied as-is; otherwise each pixel goes
/// through full-range RGBA and [`map_rgba`]. The region is clipped to both
/// surfaces.
pub fn blit(src: &Surface, dst: &mut Surface, width: u32, height: u32) {
    let width = width.min(src.width()).min(dst.width());
    let height = height.min(src.height()).min(dst.height());
    let sf = src.format();

    if sf.color_key().is_none()
        && sf.same_layout(dst.format())
        && sf.byte_order() == dst.format().byte_order()
        && (!sf.is_paletted() || sf.palette() == dst.format().palette())
    {
        trace!("blit: identical layout, copying rows");
        let len = width as usize * sf.bytes_per_pixel();
        for y in 0..height {
            dst.row_mut(y)[..len].copy_from_slice(&src.row(y)[..len]);
        }
        return;
    }

    let index_copy = sf.is_paletted() && dst.format().is_paletted();
    trace!("blit: per-pixel copy, index_copy={index_copy}");
    for y in 0..height {
        for x in 0..width {
            let px = src.pixel(x, y);
            if sf.is_color_key(px) {
                continue;
            }
            let value = if index_copy {
                px
            } else {
                map_rgba(dst.format(), expanded_channels(px, sf))
            };
            dst.set_pixel(x, y, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Palette;
    use alloc::vec;
    use rgb::{RGB8, RGBA8};

    const RGBA8888_LE: [u32; 4] = [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000];

    fn rgb565() -> PixelFormat {
        PixelFormat::from_masks(16, [0xF800, 0x07E0, 0x001F, 0]).unwrap()
    }

    #[test]
    fn invalid_target_is_an_error() {
        let src = Surface::new(2, 2, rgb565()).unwrap();
        let target = TargetFormat::new(2, 2, 12, [0; 4]);
        assert!(matches!(
            convert_surface(src, &target),
            Err(SurfaceError::UnsupportedDepth(12))
        ));
    }

    #[test]
    fn rgb565_to_rgba32_expands_channels() {
        let mut src = Surface::new(2, 1, rgb565()).unwrap();
        src.set_pixel(0, 0, 0xF800);
        src.set_pixel(1, 0, 0x07FF);
        let dst = convert_surface(src, &TargetFormat::new(2, 1, 32, RGBA8888_LE)).unwrap();
        assert_eq!(dst.format().bits_per_pixel(), 32);
        assert_eq!(dst.rgba(0, 0), RGBA8::new(248, 0, 0, 255));
        assert_eq!(dst.rgba(1, 0), RGBA8::new(0, 252, 248, 255));
    }

    #[test]
    fn keyed_direct_pixels_become_transparent() {
        let mut src = Surface::new(2, 1, rgb565()).unwrap();
        src.set_pixel(0, 0, 0xF81F);
        src.set_pixel(1, 0, 0x001F);
        src.set_color_key(Some(0xF81F));
        let dst = convert_surface(src, &TargetFormat::new(2, 1, 32, RGBA8888_LE)).unwrap();
        assert_eq!(dst.rgba(0, 0).a, 0);
        assert_eq!(dst.rgba(1, 0), RGBA8::new(0, 0, 248, 255));
    }

    #[test]
    fn paletted_to_direct_uses_palette() {
        let palette = Palette::new(vec![RGB8::new(9, 8, 7), RGB8::new(100, 150, 200)]).unwrap();
        let mut src = Surface::new(2, 1, PixelFormat::paletted(palette)).unwrap();
        src.set_pixel(1, 0, 1);
        src.set_color_key(Some(0));
        let dst = convert_surface(src, &TargetFormat::new(2, 1, 32, RGBA8888_LE)).unwrap();
        assert_eq!(dst.rgba(0, 0).a, 0);
        assert_eq!(dst.rgba(1, 0), RGBA8::new(100, 150, 200, 255));
    }

    #[test]
    fn direct_to_paletted_picks_nearest_cube_entry() {
        let mut src = Surface::new(1, 1, PixelFormat::rgba32()).unwrap();
        src.set_rgba(0, 0, RGBA8::new(255, 255, 255, 255));
        let dst = convert_surface(src, &TargetFormat::new(1, 1, 8, [0; 4])).unwrap();
        assert!(dst.format().is_paletted());
        assert_eq!(dst.pixel(0, 0), 255);
    }

    #[test]
    fn smaller_target_is_clipped() {
        let mut src = Surface::new(3, 3, PixelFormat::rgba32()).unwrap();
        src.fill(0xFFFF_FFFF);
        let dst = convert_surface(src, &TargetFormat::new(2, 4, 32, RGBA8888_LE)).unwrap();
        assert_eq!(dst.pixel(1, 2), 0xFFFF_FFFF);
        assert_eq!(dst.pixel(1, 3), 0);
    }

    #[test]
    fn blit_clips_to_both_surfaces() {
        let mut src = Surface::new(2, 2, rgb565()).unwrap();
        src.fill(0x1234);
        let mut dst = Surface::new(3, 1, rgb565()).unwrap();
        blit(&src, &mut dst, 10, 10);
        assert_eq!(dst.pixel(0, 0), 0x1234);
        assert_eq!(dst.pixel(1, 0), 0x1234);
        assert_eq!(dst.pixel(2, 0), 0);
    }
}
