//! Test fixtures for icon_forge
//!
//! Provides synthetic source images and ready-made variant sets.

use crate::{sizes, Platform, RasterVariant};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Fixture sizes for standard icon dimensions
pub mod sizes_px {
    pub const TINY: u32 = 4;
    pub const SMALL: u32 = 16;
    pub const MEDIUM: u32 = 64;
    pub const LARGE: u32 = 256;
}

/// Create a 4x4 PNG with transparency (semi-transparent red)
pub fn png_rgba_4x4_with_transparency() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes_px::TINY, sizes_px::TINY);
    for pixel in img.pixels_mut() {
        *pixel = Rgba([255, 0, 0, 128]);
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a 16x16 gradient PNG
pub fn png_rgba_16x16() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes_px::SMALL, sizes_px::SMALL);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 16) as u8, (y * 16) as u8, 128, 255]);
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a 32x64 PNG, red on the left half and blue on the right
pub fn png_rgba_32x64() -> Vec<u8> {
    let mut img = RgbaImage::new(32, 64);
    for (x, _, pixel) in img.enumerate_pixels_mut() {
        *pixel = if x < 16 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        };
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a 64x64 gradient PNG
pub fn png_rgba_64x64() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes_px::MEDIUM, sizes_px::MEDIUM);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 4) as u8, (y * 4) as u8, 128, 255]);
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a 256x256 PNG with a blue circle on a transparent background
pub fn png_rgba_256x256_icon() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes_px::LARGE, sizes_px::LARGE);
    let center = (sizes_px::LARGE / 2) as i32;
    let radius = 100i32;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as i32 - center;
        let dy = y as i32 - center;
        let in_circle = dx * dx + dy * dy < radius * radius;

        *pixel = if in_circle {
            Rgba([0, 120, 255, 255])
        } else {
            Rgba([255, 255, 255, 0])
        };
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a 512x512 gradient PNG
pub fn png_rgba_512x512() -> Vec<u8> {
    gradient_png(512)
}

/// Create a 1024x1024 gradient PNG
pub fn png_rgba_1024x1024() -> Vec<u8> {
    gradient_png(1024)
}

/// Create a 48x32 JPEG (no alpha)
pub fn jpeg_rgb_48x32() -> Vec<u8> {
    let mut img = RgbImage::new(48, 32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 5) as u8, (y * 8) as u8, 64]);
    }
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// Create a 32x32 GIF
pub fn gif_rgba_32x32() -> Vec<u8> {
    let img = RgbaImage::from_pixel(32, 32, Rgba([0, 200, 0, 255]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Gif)
}

/// Create a 32x32 lossless WebP
pub fn webp_rgba_32x32() -> Vec<u8> {
    let img = RgbaImage::from_pixel(32, 32, Rgba([200, 100, 0, 255]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::WebP)
}

/// Invalid image data for error testing
pub fn invalid_image_data() -> Vec<u8> {
    b"definitely not an image".to_vec()
}

/// A PNG cut off in the middle of its data
pub fn truncated_png() -> Vec<u8> {
    let mut data = png_rgba_64x64();
    data.truncate(data.len() / 2);
    data
}

/// BMP magic followed by garbage
pub fn bmp_header_bytes() -> Vec<u8> {
    let mut data = b"BM".to_vec();
    data.extend_from_slice(&[0u8; 62]);
    data
}

/// One solid-color variant per size of the platform
pub fn variants_for(platform: Platform) -> Vec<RasterVariant> {
    variants_of(sizes::sizes_for(platform))
}

/// One solid-color variant per given size
pub fn variants_of(sizes: &[u32]) -> Vec<RasterVariant> {
    sizes
        .iter()
        .map(|&size| {
            let pixels =
                RgbaImage::from_pixel(size, size, Rgba([(size % 256) as u8, 64, 200, 255]));
            RasterVariant::from_rgba(pixels).expect("square fixture")
        })
        .collect()
}

fn gradient_png(size: u32) -> Vec<u8> {
    let mut img = RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([
            (x * 255 / size) as u8,
            (y * 255 / size) as u8,
            160,
            255,
        ]);
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}
