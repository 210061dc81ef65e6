//! Pixel format descriptors: channel masks, shifts, losses, palette and
//! color key.

use alloc::format;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::codec::ByteOrder;
use crate::error::SurfaceError;

/// Index of the red channel in mask/shift/loss arrays.
pub const R: usize = 0;
/// Index of the green channel.
pub const G: usize = 1;
/// Index of the blue channel.
pub const B: usize = 2;
/// Index of the alpha channel.
pub const A: usize = 3;

/// Maximum palette size addressable by an 8-bit pixel.
pub const MAX_PALETTE_LEN: usize = 256;

/// Ordered RGB lookup table for paletted surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<RGB8>,
}

impl Palette {
    /// Build a palette from 1 to 256 entries.
    pub fn new(colors: Vec<RGB8>) -> Result<Self, SurfaceError> {
        if colors.is_empty() || colors.len() > MAX_PALETTE_LEN {
            return Err(SurfaceError::InvalidPalette(format!(
                "{} entries (expected 1..={MAX_PALETTE_LEN})",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// 256-entry 3-3-2 color cube, the default palette of fresh 8-bit surfaces.
    pub fn rgb332() -> Self {
        let colors = (0..=255u8)
            .map(|i| {
                let r = i >> 5;
                let g = (i >> 2) & 0x07;
                let b = i & 0x03;
                RGB8 {
                    r: (r << 5) | (r << 2) | (r >> 1),
                    g: (g << 5) | (g << 2) | (g >> 1),
                    b: b * 0x55,
                }
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes hold at least one entry.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    /// Entry at `index`. Indices past the end read as black.
    #[inline]
    pub fn get(&self, index: usize) -> RGB8 {
        self.colors.get(index).copied().unwrap_or_default()
    }

    /// Mutable access to one entry, for in-place retinting.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut RGB8> {
        self.colors.get_mut(index)
    }

    /// Overwrite entries starting at 0 with `src`, up to this palette's length.
    pub(crate) fn copy_from(&mut self, src: &Palette) {
        let n = self.colors.len().min(src.colors.len());
        self.colors[..n].copy_from_slice(&src.colors[..n]);
    }

    /// Index of the entry closest to `color` by squared RGB distance.
    /// The lowest index wins ties.
    pub fn nearest(&self, color: RGB8) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let dr = i32::from(c.r) - i32::from(color.r);
            let dg = i32::from(c.g) - i32::from(color.g);
            let db = i32::from(c.b) - i32::from(color.b);
            let dist = (dr * dr + dg * dg + db * db) as u32;
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}

/// Layout of one packed pixel.
///
/// Built once through a validated constructor; afterwards only the palette
/// entries and the color key change. One-byte formats are always paletted:
/// their masks and shifts are zero and every loss is 8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelFormat {
    bits_per_pixel: u32,
    bytes_per_pixel: usize,
    byte_order: ByteOrder,
    masks: [u32; 4],
    shifts: [u32; 4],
    losses: [u32; 4],
    palette: Option<Palette>,
    color_key: Option<u32>,
}

impl PixelFormat {
    /// 8-bit paletted format.
    pub fn paletted(palette: Palette) -> Self {
        Self {
            bits_per_pixel: 8,
            bytes_per_pixel: 1,
            byte_order: ByteOrder::NATIVE,
            masks: [0; 4],
            shifts: [0; 4],
            losses: [8; 4],
            palette: Some(palette),
            color_key: None,
        }
    }

    /// Build a format from a depth and host-order `[R, G, B, A]` masks.
    ///
    /// Depth 8 yields a paletted format with the [`Palette::rgb332`] palette
    /// and requires all masks to be zero. Depths 15, 16, 24 and 32 are
    /// direct-color in native byte order. Each mask must be a contiguous run
    /// of bits inside the depth, and no two masks may share a bit. A zero mask
    /// marks the channel as absent.
    pub fn from_masks(depth: u32, masks: [u32; 4]) -> Result<Self, SurfaceError> {
        let bytes_per_pixel = match depth {
            8 => {
                if let Some(&mask) = masks.iter().find(|&&m| m != 0) {
                    return Err(SurfaceError::InvalidMask {
                        mask,
                        reason: "paletted formats carry no channel masks",
                    });
                }
                return Ok(Self::paletted(Palette::rgb332()));
            }
            15 | 16 => 2,
            24 => 3,
            32 => 4,
            other => return Err(SurfaceError::UnsupportedDepth(other)),
        };

        let mut seen = 0u32;
        let mut shifts = [0u32; 4];
        let mut losses = [8u32; 4];
        for (i, &mask) in masks.iter().enumerate() {
            if mask == 0 {
                continue;
            }
            if depth < 32 && mask >> depth != 0 {
                return Err(SurfaceError::InvalidMask {
                    mask,
                    reason: "mask exceeds pixel depth",
                });
            }
            let shift = mask.trailing_zeros();
            let run = mask >> shift;
            if run & run.wrapping_add(1) != 0 {
                return Err(SurfaceError::InvalidMask {
                    mask,
                    reason: "mask bits are not contiguous",
                });
            }
            if seen & mask != 0 {
                return Err(SurfaceError::OverlappingMasks(seen & mask));
            }
            seen |= mask;
            shifts[i] = shift;
            losses[i] = 8u32.saturating_sub(mask.count_ones());
        }

        Ok(Self {
            bits_per_pixel: depth,
            bytes_per_pixel,
            byte_order: ByteOrder::NATIVE,
            masks,
            shifts,
            losses,
            palette: None,
            color_key: None,
        })
    }

    /// 32-bit format storing R, G, B, A bytes in that memory order on every
    /// host.
    pub fn rgba32() -> Self {
        Self {
            bits_per_pixel: 32,
            bytes_per_pixel: 4,
            byte_order: ByteOrder::Little,
            masks: [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
            shifts: [0, 8, 16, 24],
            losses: [0; 4],
            palette: None,
            color_key: None,
        }
    }

    /// Same layout with multi-byte pixels assembled in `order`.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Same layout with the given color key.
    pub fn with_color_key(mut self, key: Option<u32>) -> Self {
        self.color_key = key;
        self
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// `[R, G, B, A]` masks.
    pub fn masks(&self) -> [u32; 4] {
        self.masks
    }

    /// `[R, G, B, A]` shifts.
    pub fn shifts(&self) -> [u32; 4] {
        self.shifts
    }

    /// `[R, G, B, A]` losses: bits out of 8 not stored.
    pub fn losses(&self) -> [u32; 4] {
        self.losses
    }

    pub fn alpha_mask(&self) -> u32 {
        self.masks[A]
    }

    pub fn is_paletted(&self) -> bool {
        self.bytes_per_pixel == 1
    }

    /// Direct-color format with an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.masks[A] != 0
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn palette_mut(&mut self) -> Option<&mut Palette> {
        self.palette.as_mut()
    }

    pub fn color_key(&self) -> Option<u32> {
        self.color_key
    }

    pub fn set_color_key(&mut self, key: Option<u32>) {
        self.color_key = key;
    }

    /// Whether `pixel` is the designated transparent value, ignoring alpha bits.
    #[inline]
    pub fn is_color_key(&self, pixel: u32) -> bool {
        match self.color_key {
            Some(key) => {
                let not_alpha = !self.masks[A];
                key & not_alpha == pixel & not_alpha
            }
            None => false,
        }
    }

    /// Same depth and channel masks.
    pub fn same_layout(&self, other: &PixelFormat) -> bool {
        self.bits_per_pixel == other.bits_per_pixel && self.masks == other.masks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_shifts_and_losses() {
        let f = PixelFormat::from_masks(16, [0xF800, 0x07E0, 0x001F, 0]).unwrap();
        assert_eq!(f.bytes_per_pixel(), 2);
        assert_eq!(f.shifts(), [11, 5, 0, 0]);
        assert_eq!(f.losses(), [3, 2, 3, 8]);
        assert!(!f.has_alpha());
        assert!(!f.is_paletted());
    }

    #[test]
    fn argb1555_and_wide_masks() {
        let f = PixelFormat::from_masks(16, [0x7C00, 0x03E0, 0x001F, 0x8000]).unwrap();
        assert_eq!(f.shifts(), [10, 5, 0, 15]);
        assert_eq!(f.losses(), [3, 3, 3, 7]);

        let f = PixelFormat::from_masks(32, [0x3FF0_0000, 0x000F_FC00, 0x0000_03FF, 0xC000_0000])
            .unwrap();
        assert_eq!(f.losses(), [0, 0, 0, 6]);
    }

    #[test]
    fn depth_eight_is_paletted() {
        let f = PixelFormat::from_masks(8, [0; 4]).unwrap();
        assert!(f.is_paletted());
        assert_eq!(f.losses(), [8; 4]);
        assert_eq!(f.palette().map(Palette::len), Some(256));
        assert!(PixelFormat::from_masks(8, [0xE0, 0x1C, 0x03, 0]).is_err());
    }

    #[test]
    fn rejects_bad_depths_and_masks() {
        assert!(matches!(
            PixelFormat::from_masks(12, [0; 4]),
            Err(SurfaceError::UnsupportedDepth(12))
        ));
        assert!(matches!(
            PixelFormat::from_masks(16, [0x1_0000, 0, 0, 0]),
            Err(SurfaceError::InvalidMask { .. })
        ));
        assert!(matches!(
            PixelFormat::from_masks(32, [0x0000_0F0F, 0, 0, 0]),
            Err(SurfaceError::InvalidMask { .. })
        ));
        assert!(matches!(
            PixelFormat::from_masks(32, [0x0000_FFFF, 0x0000_FF00, 0, 0]),
            Err(SurfaceError::OverlappingMasks(0xFF00))
        ));
    }

    #[test]
    fn color_key_ignores_alpha_bits() {
        let f = PixelFormat::rgba32().with_color_key(Some(0x8000_00FF));
        assert!(f.is_color_key(0x0000_00FF));
        assert!(f.is_color_key(0xFF00_00FF));
        assert!(!f.is_color_key(0x0000_00FE));
    }

    #[test]
    fn palette_bounds() {
        assert!(Palette::new(Vec::new()).is_err());
        assert!(Palette::new(alloc::vec![RGB8::default(); 257]).is_err());
        let p = Palette::new(alloc::vec![RGB8 { r: 1, g: 2, b: 3 }]).unwrap();
        assert_eq!(p.get(0), RGB8 { r: 1, g: 2, b: 3 });
        assert_eq!(p.get(200), RGB8::default());
    }

    #[test]
    fn rgb332_corners_and_nearest() {
        let p = Palette::rgb332();
        assert_eq!(p.get(0), RGB8 { r: 0, g: 0, b: 0 });
        assert_eq!(p.get(255), RGB8 { r: 255, g: 255, b: 255 });
        assert_eq!(p.nearest(RGB8 { r: 255, g: 255, b: 255 }), 255);
        assert_eq!(p.nearest(RGB8 { r: 250, g: 3, b: 2 }), 0b111_000_00);
    }
}
