//! Synthetic scenes and controlled variants of them for the integration tests.
//!
//! The scenes are smooth and free of flat regions so block means and DCT
//! coefficients sit well clear of their medians.
#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use image_fingerprint_core::RasterImage;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

/// Three out-of-phase colour gradients
pub fn waves(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let u = x as f64 / width as f64;
        let v = y as f64 / height as f64;
        let r = 128.0 + 100.0 * (TAU * (1.3 * u + 0.4 * v)).sin();
        let g = 128.0 + 90.0 * (TAU * (0.7 * u - 1.1 * v)).cos();
        let b = 128.0 + 80.0 * (TAU * (2.1 * u * v + 0.25)).sin();
        Rgb([r.round() as u8, g.round() as u8, b.round() as u8])
    })
}

/// Grey interference pattern, unrelated to `waves`
pub fn ripples(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let u = x as f64 / width as f64;
        let v = y as f64 / height as f64;
        let l = 128.0
            + 70.0 * (TAU * (0.9 * u + 1.7 * v * v)).sin()
            + 40.0 * (TAU * 2.3 * u * v).cos();
        let l = l.clamp(0.0, 255.0).round() as u8;
        Rgb([l, l, l])
    })
}

pub fn to_raster(img: &RgbImage) -> RasterImage {
    RasterImage::from_dynamic(&DynamicImage::ImageRgb8(img.clone())).unwrap()
}

/// Re-encode as JPEG at `quality` and decode again
pub fn jpeg_roundtrip(img: &RgbImage, quality: u8) -> RasterImage {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(img)
        .unwrap();
    RasterImage::from_bytes(&buf).unwrap()
}

pub fn resized(img: &RgbImage, width: u32, height: u32) -> RasterImage {
    to_raster(&imageops::resize(img, width, height, FilterType::Triangle))
}

pub fn save(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}
