//! Pixel value <-> RGBA channel mapping.
//!
//! "Raw" channels are in the format's native range (a 5-bit channel reads
//! 0..=31). "Expanded" channels are shifted left by each channel's loss into
//! 0..=255. Paletted formats read their palette; palette entries are already
//! full range.

use rgb::{RGB8, RGBA8};

use crate::format::{A, B, G, PixelFormat, R};

/// Channels of `pixel` without bit expansion.
///
/// Absent alpha reads as 255. A pixel matching the color key (alpha bits
/// ignored) reads alpha 0.
#[inline]
pub fn raw_channels(pixel: u32, format: &PixelFormat) -> RGBA8 {
    let mut v = if format.is_paletted() {
        let c = format
            .palette()
            .map(|p| p.get(pixel as usize))
            .unwrap_or_default();
        RGBA8::new(c.r, c.g, c.b, 0xFF)
    } else {
        let masks = format.masks();
        let shifts = format.shifts();
        let ch = |i: usize| ((pixel & masks[i]) >> shifts[i]) as u8;
        let a = if masks[A] == 0 { 0xFF } else { ch(A) };
        RGBA8::new(ch(R), ch(G), ch(B), a)
    };

    if format.is_color_key(pixel) {
        v.a = 0;
    }
    v
}

/// Channels of `pixel` expanded to 0..=255.
///
/// Alpha is 255 whenever the format stores no alpha bits, color key or not.
/// Paletted formats give the palette entry, opaque. Use [`raw_channels`] to
/// see the color key.
#[inline]
pub fn expanded_channels(pixel: u32, format: &PixelFormat) -> RGBA8 {
    if format.is_paletted() {
        let c = format
            .palette()
            .map(|p| p.get(pixel as usize))
            .unwrap_or_default();
        return RGBA8::new(c.r, c.g, c.b, 0xFF);
    }
    let raw = raw_channels(pixel, format);
    let losses = format.losses();
    let expand = |c: u8, loss: u32| (u32::from(c) << loss) as u8;
    let a = if losses[A] == 8 {
        0xFF
    } else {
        expand(raw.a, losses[A])
    };
    RGBA8::new(
        expand(raw.r, losses[R]),
        expand(raw.g, losses[G]),
        expand(raw.b, losses[B]),
        a,
    )
}

/// Inverse of [`raw_channels`] for direct-color formats.
///
/// Channels without a mask contribute nothing.
#[inline]
pub fn set_raw_channels(format: &PixelFormat, v: RGBA8) -> u32 {
    let masks = format.masks();
    let shifts = format.shifts();
    [v.r, v.g, v.b, v.a]
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &c)| acc | ((u32::from(c) << shifts[i]) & masks[i]))
}

/// Inverse of [`expanded_channels`] for direct-color formats; drops the low
/// bits the format cannot store.
#[inline]
pub fn set_expanded_channels(format: &PixelFormat, v: RGBA8) -> u32 {
    let masks = format.masks();
    let shifts = format.shifts();
    let losses = format.losses();
    [v.r, v.g, v.b, v.a]
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &c)| {
            acc | (((u32::from(c) >> losses[i]) << shifts[i]) & masks[i])
        })
}

/// Map an expanded RGBA value to a pixel of `format`.
///
/// Paletted formats pick the nearest palette entry and ignore alpha.
pub fn map_rgba(format: &PixelFormat, v: RGBA8) -> u32 {
    if format.is_paletted() {
        return format
            .palette()
            .map(|p| u32::from(p.nearest(RGB8::new(v.r, v.g, v.b))))
            .unwrap_or(0);
    }
    set_expanded_channels(format, v)
}

/// Stored bits per `[R, G, B, A]` channel.
///
/// Paletted formats report 8 for every channel: the palette is 8888 even
/// though their losses are all 8.
pub fn channel_bit_depths(format: &PixelFormat) -> [u32; 4] {
    if format.is_paletted() {
        return [8; 4];
    }
    format.losses().map(|loss| 8 - loss)
}
