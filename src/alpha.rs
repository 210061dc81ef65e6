//! Transparency classification and hidden-alpha fixup.
//!
//! When a texture is magnified with filtering, fully transparent pixels get
//! blended into their visible neighbors and their RGB shows as a fringe.
//! Most images have one border color, found by scanning for the first
//! visible pixel. To catch images that don't, the scan also runs in reverse;
//! if the two disagree the hidden color falls back to black.

use log::debug;
use rgb::{RGB8, RGBA8};

use crate::channels::{expanded_channels, map_rgba};
use crate::surface::Surface;

/// How much of the alpha range a surface uses. Ordered by need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Transparency {
    /// Every pixel is opaque.
    #[default]
    None,
    /// Pixels are either opaque or fully transparent.
    Binary,
    /// Some pixels are partially transparent.
    Full,
}

/// Classify the transparency a surface needs, in one scan.
///
/// Paletted surfaces are [`Transparency::Binary`] at most, when a pixel hits
/// the color key. Direct-color surfaces without an alpha mask are always
/// [`Transparency::None`].
pub fn classify_transparency(surface: &Surface) -> Transparency {
    let format = surface.format();
    let paletted = format.is_paletted();
    let key = format.color_key();
    let amask = format.alpha_mask();
    if (paletted && key.is_none()) || (!paletted && amask == 0) {
        return Transparency::None;
    }

    let mut need = Transparency::None;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let px = surface.pixel(x, y);
            let here = if paletted {
                if Some(px) == key {
                    Transparency::Binary
                } else {
                    Transparency::None
                }
            } else {
                match px & amask {
                    0 => Transparency::Binary,
                    a if a != amask => Transparency::Full,
                    _ => Transparency::None,
                }
            };
            need = need.max(here);
            if need == Transparency::Full {
                return need;
            }
        }
    }
    need
}

fn is_visible(surface: &Surface, px: u32) -> bool {
    let format = surface.format();
    if format.is_paletted() {
        Some(px) != format.color_key()
    } else {
        px & format.alpha_mask() != 0
    }
}

/// RGB of the first non-transparent pixel.
///
/// Scans top-to-bottom, left-to-right, or bottom-to-top, right-to-left when
/// `reverse`. Returns `None` if the surface cannot hold transparent pixels
/// (paletted without a color key, direct-color without alpha) and black if
/// every pixel is transparent.
pub fn find_border_color(surface: &Surface, reverse: bool) -> Option<RGB8> {
    let format = surface.format();
    if format.is_paletted() && format.color_key().is_none() {
        return None;
    }
    if !format.is_paletted() && !format.has_alpha() {
        return None;
    }

    let (w, h) = (surface.width(), surface.height());
    let found = if reverse {
        (0..h)
            .rev()
            .flat_map(|y| (0..w).rev().map(move |x| (x, y)))
            .map(|(x, y)| surface.pixel(x, y))
            .find(|&px| is_visible(surface, px))
    } else {
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| surface.pixel(x, y))
            .find(|&px| is_visible(surface, px))
    };

    Some(match found {
        Some(px) => {
            let c = expanded_channels(px, format);
            RGB8::new(c.r, c.g, c.b)
        }
        None => RGB8::default(),
    })
}

/// Give every fully transparent pixel the surface's border color, so
/// filtering doesn't pull stray RGB into visible pixels. Alpha never changes.
///
/// Paletted surfaces retint the color key's palette entry in place.
/// Direct-color surfaces rewrite each pixel whose alpha bits are zero.
/// Returns the color used, or `None` when the surface has no transparency.
pub fn fix_hidden_alpha(surface: &mut Surface) -> Option<RGB8> {
    let forward = find_border_color(surface, false)?;
    let backward = find_border_color(surface, true)?;
    let color = if forward == backward {
        forward
    } else {
        debug!("hidden alpha: border colors disagree ({forward:?} vs {backward:?}), using black");
        RGB8::default()
    };
    debug!(
        "hidden alpha: {}x{} surface, border color {color:?}",
        surface.width(),
        surface.height()
    );

    if surface.format().is_paletted() {
        if let Some(key) = surface.color_key() {
            if let Some(entry) = surface
                .palette_mut()
                .and_then(|p| p.entry_mut(key as usize))
            {
                *entry = color;
            }
        }
        return Some(color);
    }

    let amask = surface.format().alpha_mask();
    let trans = map_rgba(surface.format(), RGBA8::new(color.r, color.g, color.b, 0));
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let px = surface.pixel(x, y);
            if px != trans && px & amask == 0 {
                surface.set_pixel(x, y, trans);
            }
        }
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Palette, PixelFormat};
    use alloc::vec;

    fn argb1555() -> PixelFormat {
        PixelFormat::from_masks(16, [0x7C00, 0x03E0, 0x001F, 0x8000]).unwrap()
    }

    #[test]
    fn opaque_formats_classify_as_none() {
        let s = Surface::new(2, 2, PixelFormat::from_masks(16, [0xF800, 0x07E0, 0x1F, 0]).unwrap())
            .unwrap();
        assert_eq!(classify_transparency(&s), Transparency::None);
        assert_eq!(find_border_color(&s, false), None);
    }

    #[test]
    fn one_bit_alpha_is_binary() {
        let mut s = Surface::new(2, 1, argb1555()).unwrap();
        s.set_pixel(0, 0, 0x801F);
        assert_eq!(classify_transparency(&s), Transparency::Binary);
        s.set_pixel(1, 0, 0x801F);
        assert_eq!(classify_transparency(&s), Transparency::None);
    }

    #[test]
    fn partial_alpha_is_full() {
        let mut s = Surface::new(3, 1, PixelFormat::rgba32()).unwrap();
        s.set_rgba(0, 0, RGBA8::new(0, 0, 0, 0));
        s.set_rgba(1, 0, RGBA8::new(0, 0, 0, 128));
        s.set_rgba(2, 0, RGBA8::new(0, 0, 0, 255));
        assert_eq!(classify_transparency(&s), Transparency::Full);
    }

    #[test]
    fn classification_never_downgrades() {
        let mut s = Surface::new(3, 1, PixelFormat::rgba32()).unwrap();
        s.set_rgba(0, 0, RGBA8::new(0, 0, 0, 100));
        s.set_rgba(1, 0, RGBA8::new(0, 0, 0, 0));
        s.set_rgba(2, 0, RGBA8::new(0, 0, 0, 255));
        assert_eq!(classify_transparency(&s), Transparency::Full);
    }

    #[test]
    fn paletted_key_is_binary() {
        let palette = Palette::new(vec![RGB8::new(255, 0, 255), RGB8::new(1, 2, 3)]).unwrap();
        let mut s = Surface::new(2, 1, PixelFormat::paletted(palette)).unwrap();
        s.set_pixel(1, 0, 1);
        assert_eq!(classify_transparency(&s), Transparency::None);
        s.set_color_key(Some(0));
        assert_eq!(classify_transparency(&s), Transparency::Binary);
    }

    #[test]
    fn reverse_scan_starts_bottom_right() {
        let mut s = Surface::new(3, 2, PixelFormat::rgba32()).unwrap();
        s.set_rgba(1, 0, RGBA8::new(1, 1, 1, 255));
        s.set_rgba(0, 1, RGBA8::new(2, 2, 2, 255));
        s.set_rgba(1, 1, RGBA8::new(3, 3, 3, 255));
        assert_eq!(find_border_color(&s, false), Some(RGB8::new(1, 1, 1)));
        assert_eq!(find_border_color(&s, true), Some(RGB8::new(3, 3, 3)));
    }

    #[test]
    fn disagreement_falls_back_to_black() {
        let mut s = Surface::new(3, 1, PixelFormat::rgba32()).unwrap();
        s.set_rgba(0, 0, RGBA8::new(200, 0, 0, 255));
        s.set_rgba(1, 0, RGBA8::new(50, 60, 70, 0));
        s.set_rgba(2, 0, RGBA8::new(0, 200, 0, 255));
        assert_eq!(fix_hidden_alpha(&mut s), Some(RGB8::default()));
        assert_eq!(s.rgba(1, 0), RGBA8::new(0, 0, 0, 0));
        assert_eq!(s.rgba(0, 0), RGBA8::new(200, 0, 0, 255));
    }

    #[test]
    fn paletted_fix_retints_key_entry() {
        let palette = Palette::new(vec![RGB8::new(255, 0, 255), RGB8::new(10, 20, 30)]).unwrap();
        let mut s = Surface::new(3, 1, PixelFormat::paletted(palette)).unwrap();
        s.set_pixel(1, 0, 1);
        s.set_color_key(Some(0));
        assert_eq!(fix_hidden_alpha(&mut s), Some(RGB8::new(10, 20, 30)));
        let palette = s.format().palette().unwrap();
        assert_eq!(palette.get(0), RGB8::new(10, 20, 30));
        assert_eq!(s.pixel(0, 0), 0);
        assert_eq!(s.raw_rgba(0, 0).a, 0);
    }
}
