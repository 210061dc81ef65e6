//! Generic single-pixel codec for 1, 2, 3 and 4 byte-per-pixel buffers.
//!
//! Pixel width varies per surface, so the width is a runtime argument and the
//! dispatch happens inside the innermost loop. There is no 24-bit integer
//! type, so the 3-byte case is assembled by hand for either byte order.

/// Byte order used to assemble multi-byte pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;
    /// Byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// Read one pixel of `bytes_per_pixel` bytes at `offset`.
///
/// Returns 0 for unsupported widths (0 or more than 4).
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + bytes_per_pixel`.
#[inline]
pub fn decode_pixel(buf: &[u8], offset: usize, bytes_per_pixel: usize, order: ByteOrder) -> u32 {
    match bytes_per_pixel {
        1 => u32::from(buf[offset]),
        2 => {
            let b = [buf[offset], buf[offset + 1]];
            u32::from(match order {
                ByteOrder::Little => u16::from_le_bytes(b),
                ByteOrder::Big => u16::from_be_bytes(b),
            })
        }
        3 => {
            let p = &buf[offset..offset + 3];
            match order {
                ByteOrder::Little => u32::from(p[0]) | u32::from(p[1]) << 8 | u32::from(p[2]) << 16,
                ByteOrder::Big => u32::from(p[0]) << 16 | u32::from(p[1]) << 8 | u32::from(p[2]),
            }
        }
        4 => {
            let b = [buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]];
            match order {
                ByteOrder::Little => u32::from_le_bytes(b),
                ByteOrder::Big => u32::from_be_bytes(b),
            }
        }
        _ => 0,
    }
}

/// Write `value`, truncated to `bytes_per_pixel` bytes, at `offset`.
///
/// Unsupported widths write nothing.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + bytes_per_pixel`.
#[inline]
pub fn encode_pixel(
    buf: &mut [u8],
    offset: usize,
    bytes_per_pixel: usize,
    order: ByteOrder,
    value: u32,
) {
    match bytes_per_pixel {
        1 => buf[offset] = value as u8,
        2 => {
            let v = value as u16;
            let b = match order {
                ByteOrder::Little => v.to_le_bytes(),
                ByteOrder::Big => v.to_be_bytes(),
            };
            buf[offset..offset + 2].copy_from_slice(&b);
        }
        3 => {
            let p = &mut buf[offset..offset + 3];
            let (lo, mid, hi) = (value as u8, (value >> 8) as u8, (value >> 16) as u8);
            match order {
                ByteOrder::Little => {
                    p[0] = lo;
                    p[1] = mid;
                    p[2] = hi;
                }
                ByteOrder::Big => {
                    p[0] = hi;
                    p[1] = mid;
                    p[2] = lo;
                }
            }
        }
        4 => {
            let b = match order {
                ByteOrder::Little => value.to_le_bytes(),
                ByteOrder::Big => value.to_be_bytes(),
            };
            buf[offset..offset + 4].copy_from_slice(&b);
        }
        _ => {}
    }
}

/// Swap the low three bytes: `0x00112233 -> 0x00332211`.
#[inline]
pub const fn swap24(x: u32) -> u32 {
    x.swap_bytes() >> 8
}

/// Interpret a 16-bit little-endian value in host order.
#[inline]
pub const fn swap_le16(x: u16) -> u16 {
    u16::from_le(x)
}

/// Interpret a 24-bit little-endian value in host order.
#[inline]
pub const fn swap_le24(x: u32) -> u32 {
    if cfg!(target_endian = "big") {
        swap24(x)
    } else {
        x
    }
}

/// Interpret a 32-bit little-endian value in host order.
#[inline]
pub const fn swap_le32(x: u32) -> u32 {
    u32::from_le(x)
}

/// Convert a channel mask written in little-endian convention to host order
/// for a pixel of `depth` bits.
///
/// Texture upload paths expect pixel storage in little-endian order, so
/// target masks are given that way and normalized here. Depths other than
/// 15/16, 24 and 32 are returned unchanged.
pub fn native_mask(depth: u32, mask: u32) -> u32 {
    match depth {
        15 | 16 => u32::from(swap_le16(mask as u16)),
        24 => swap_le24(mask),
        32 => swap_le32(mask),
        _ => mask,
    }
}
