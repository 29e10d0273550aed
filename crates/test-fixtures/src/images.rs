//! Synthetic images encoded in memory.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

/// A `width`×`height` PNG with a gradient pattern seeded by `seed`.
/// Different seeds give visibly different images.
pub fn png_bytes(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x as u8).wrapping_mul(3).wrapping_add(seed),
            (y as u8).wrapping_mul(5).wrapping_add(seed.wrapping_mul(7)),
            ((x ^ y) as u8).wrapping_add(seed.wrapping_mul(13)),
        ])
    });
    encode_png(&img)
}

/// A single-color PNG.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(width, height, Rgb(rgb)))
}

fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("in-memory PNG encoding cannot fail");
    out.into_inner()
}
