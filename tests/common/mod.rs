//! Common test utilities and helpers for the grid_reveal tests

#![allow(dead_code)]

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

pub const RED: [u8; 4] = [220, 30, 30, 255];
pub const GREEN: [u8; 4] = [30, 200, 40, 255];
pub const BLUE: [u8; 4] = [30, 40, 220, 255];
pub const YELLOW: [u8; 4] = [230, 220, 30, 255];

/// Image whose four quadrants are red, green, blue and yellow (TL, TR, BL, BR).
pub fn quadrant_colors(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let right = x >= width / 2;
        let bottom = y >= height / 2;
        Rgba(match (bottom, right) {
            (false, false) => RED,
            (false, true) => GREEN,
            (true, false) => BLUE,
            (true, true) => YELLOW,
        })
    })
}

/// Image made of four solid horizontal bands, top to bottom: red, green, blue, yellow.
pub fn band_colors(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        Rgba(match (y * 4) / height {
            0 => RED,
            1 => GREEN,
            2 => BLUE,
            _ => YELLOW,
        })
    })
}

pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Lossless PNG encoding of `image`, the usual pipeline input in tests.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encode");
    bytes
}

/// Decode pipeline output back to RGB for pixel checks.
pub fn decode(bytes: &[u8]) -> image::RgbImage {
    image::load_from_memory(bytes).expect("decode output").to_rgb8()
}

/// Compare a decoded pixel to an expected color with JPEG tolerance.
pub fn assert_near(actual: &image::Rgb<u8>, expected: [u8; 4], tolerance: i32, what: &str) {
    for c in 0..3 {
        let diff = (i32::from(actual[c]) - i32::from(expected[c])).abs();
        assert!(
            diff <= tolerance,
            "{what}: channel {c} is {} expected {} (±{tolerance})",
            actual[c],
            expected[c]
        );
    }
}

/// Mean luma of row `y`.
pub fn row_luma(image: &image::RgbImage, y: u32) -> f64 {
    let sum: u64 = (0..image.width())
        .map(|x| {
            let p = image.get_pixel(x, y);
            u64::from(p[0]) + u64::from(p[1]) + u64::from(p[2])
        })
        .sum();
    sum as f64 / (3 * image.width()) as f64
}
