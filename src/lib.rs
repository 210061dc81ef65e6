//! # zensurface
//!
//! Pixel-format-agnostic raster surfaces and the fixups textures need
//! before GPU upload.
//!
//! ## What's here
//!
//! - **Pixel codec** ([`decode_pixel`], [`encode_pixel`]): 1/2/3/4-byte
//!   pixels in either byte order.
//! - **Channel access** ([`raw_channels`], [`expanded_channels`] and their
//!   inverses): arbitrary contiguous channel masks, sub-8-bit channels,
//!   palettes, and color-key transparency.
//! - **Format conversion** ([`convert_surface`]): repaint a surface into a
//!   new depth and mask layout, keeping palette and color-key semantics,
//!   and skipping the copy when nothing would change.
//! - **Hidden-alpha fixup** ([`fix_hidden_alpha`]): give fully transparent
//!   pixels a plausible RGB so magnified textures don't show a fringe.
//!   [`classify_transparency`] reports whether a surface needs no alpha,
//!   1-bit alpha, or full alpha.
//!
//! ## Non-Goals
//!
//! - Image file decoding, scaling, or GPU upload
//! - Filters, blending, color management
//!
//! ## Usage
//!
//! ```
//! use zensurface::{
//!     classify_transparency, convert_surface, fix_hidden_alpha, PixelFormat, Surface,
//!     TargetFormat, Transparency,
//! };
//!
//! // 16-bit ARGB1555 surface from a loader
//! let format = PixelFormat::from_masks(16, [0x7C00, 0x03E0, 0x001F, 0x8000])?;
//! let mut surface = Surface::new(4, 4, format)?;
//! surface.set_pixel(1, 1, 0x8000 | 0x7C00); // opaque red
//!
//! assert_eq!(classify_transparency(&surface), Transparency::Binary);
//! fix_hidden_alpha(&mut surface);
//!
//! // Normalize to RGBA8888 (masks in little-endian convention)
//! let target = TargetFormat::new(4, 4, 32, [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000]);
//! let surface = convert_surface(surface, &target)?;
//! assert_eq!(surface.rgba(0, 0).r, 248);
//! assert_eq!(surface.rgba(0, 0).a, 0);
//! # Ok::<(), zensurface::SurfaceError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod alpha;
mod channels;
mod codec;
mod convert;
mod error;
mod format;
#[cfg(feature = "imgref")]
mod interop;
mod limits;
mod surface;

// Re-exports
pub use alpha::{Transparency, classify_transparency, find_border_color, fix_hidden_alpha};
pub use channels::{
    channel_bit_depths, expanded_channels, map_rgba, raw_channels, set_expanded_channels,
    set_raw_channels,
};
pub use codec::{
    ByteOrder, decode_pixel, encode_pixel, native_mask, swap_le16, swap_le24, swap_le32, swap24,
};
pub use convert::{TargetFormat, blit, convert_surface, convert_surface_with_limits};
pub use error::SurfaceError;
pub use format::{A, B, G, MAX_PALETTE_LEN, Palette, PixelFormat, R};
pub use limits::Limits;
pub use rgb::{RGB8, RGBA8};
pub use surface::Surface;
