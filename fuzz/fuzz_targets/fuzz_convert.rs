#![no_main]
use libfuzzer_sys::fuzz_target;
use zensurface::*;

const LAYOUTS: [(u32, [u32; 4]); 6] = [
    (8, [0; 4]),
    (16, [0xF800, 0x07E0, 0x001F, 0]),
    (16, [0x0F00, 0x00F0, 0x000F, 0xF000]),
    (24, [0xFF, 0xFF00, 0xFF_0000, 0]),
    (32, [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000]),
    (32, [0xFF_0000, 0xFF00, 0xFF, 0]),
];

fuzz_target!(|data: &[u8]| {
    // [w, h, src layout, dst layout, key flag, key, pixels...]
    let [w, h, src, dst, keyed, key, pixels @ ..] = data else {
        return;
    };
    let (w, h) = (u32::from(w % 16), u32::from(h % 16));
    let (src_depth, src_masks) = LAYOUTS[*src as usize % LAYOUTS.len()];
    let (dst_depth, dst_masks) = LAYOUTS[*dst as usize % LAYOUTS.len()];

    let format = PixelFormat::from_masks(src_depth, src_masks).unwrap();
    let Ok(mut surface) = Surface::new(w, h, format) else {
        return;
    };
    for (d, s) in surface.pixels_mut().iter_mut().zip(pixels) {
        *d = *s;
    }
    if keyed & 1 == 1 {
        surface.set_color_key(Some(u32::from(*key)));
    }

    let target = TargetFormat::new(w, h, dst_depth, dst_masks);
    let before = surface.clone();
    let out = convert_surface(surface, &target).unwrap();
    assert_eq!(out.width(), w);
    assert_eq!(out.height(), h);
    assert!(out.format().same_layout(&target.pixel_format().unwrap()));

    // Keyed source pixels must come out transparent whenever the target can say so.
    if before.color_key().is_some() && (out.format().has_alpha() || out.color_key().is_some()) {
        for y in 0..h {
            for x in 0..w {
                if before.format().is_color_key(before.pixel(x, y)) {
                    assert_eq!(out.raw_rgba(x, y).a, 0, "({x},{y})");
                }
            }
        }
    }
});
