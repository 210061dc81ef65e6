#![no_main]
use libfuzzer_sys::fuzz_target;
use zensurface::*;

fuzz_target!(|data: &[u8]| {
    // [w, h, depth selector, pixels...]
    let [w, h, sel, pixels @ ..] = data else {
        return;
    };
    let (w, h) = (u32::from(w % 16), u32::from(h % 16));
    let format = match sel % 3 {
        0 => PixelFormat::rgba32(),
        1 => PixelFormat::from_masks(16, [0x7C00, 0x03E0, 0x001F, 0x8000]).unwrap(),
        _ => PixelFormat::from_masks(16, [0x0F00, 0x00F0, 0x000F, 0xF000]).unwrap(),
    };
    let Ok(mut surface) = Surface::new(w, h, format) else {
        return;
    };
    for (d, s) in surface.pixels_mut().iter_mut().zip(pixels) {
        *d = *s;
    }

    let before = surface.clone();
    let class = classify_transparency(&surface);
    fix_hidden_alpha(&mut surface);

    // Only the RGB of fully transparent pixels may change.
    assert_eq!(classify_transparency(&surface), class);
    let amask = surface.format().alpha_mask();
    for y in 0..h {
        for x in 0..w {
            let (old, new) = (before.pixel(x, y), surface.pixel(x, y));
            assert_eq!(old & amask, new & amask);
            if old & amask != 0 {
                assert_eq!(old, new);
            }
        }
    }
});
