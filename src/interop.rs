//! [`imgref`] buffers in and out of [`Surface`], for loaders and scalers
//! that work on typed RGBA pixels.

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::error::SurfaceError;
use crate::format::PixelFormat;
use crate::surface::Surface;

impl Surface {
    /// Copy typed RGBA pixels into a 32-bit [`PixelFormat::rgba32`] surface.
    pub fn from_rgba8(img: ImgRef<'_, RGBA8>) -> Result<Self, SurfaceError> {
        let (width, height) = surface_dims(img.width(), img.height())?;
        let mut surface = Surface::new(width, height, PixelFormat::rgba32())?;
        for (y, row) in img.rows().enumerate() {
            for (px, c) in surface.row_mut(y as u32).chunks_exact_mut(4).zip(row) {
                px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        Ok(surface)
    }

    /// Expanded RGBA of every pixel, as [`Surface::rgba`] reads it.
    pub fn to_rgba8(&self) -> ImgVec<RGBA8> {
        let (w, h) = (self.width(), self.height());
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                out.push(self.rgba(x, y));
            }
        }
        ImgVec::new(out, w as usize, h as usize)
    }
}

fn surface_dims(width: usize, height: usize) -> Result<(u32, u32), SurfaceError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(SurfaceError::DimensionsTooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        }),
    }
}
