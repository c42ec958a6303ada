//! # Perceptual Hashing Module
//!
//! DCT-based perceptual hash. The image is reduced to grayscale, resampled to
//! a small square and transformed into the frequency domain; the lowest
//! frequencies describe the overall structure of the picture and survive
//! recompression and resizing almost unchanged.
//!
//! ## Process
//!
//! 1. Grayscale with `0.299 R + 0.587 G + 0.114 B` into a fresh buffer
//! 2. Lanczos-resample to `hash_size * highfreq_factor` square
//! 3. 2D type-II DCT (columns, then rows)
//! 4. Keep the top-left `hash_size x hash_size` coefficients, DC term included
//! 5. One bit per coefficient: above the block median or not
//!
//! ## Hamming Distance Interpretation
//!
//! With the default 64-bit hash:
//!
//! - 0-3: Nearly identical images (same image with minor modifications)
//! - 4-10: Similar images (same subject with moderate differences)
//! - >10: Different images
//!
//! ## References
//!
//! - "Looks Like It", Neal Krawetz, hackerfactor.com
//! - "Implementation and analysis of DCT based global perceptual image hashing" by Bian Yang, et al.

use ndarray::{s, Array2};

use super::dct::dct_2d;
use super::median;
use super::resize::resize;
use crate::error::{Error, Result};
use crate::types::{ImageHash, RasterImage};

/// Default side of the low-frequency block, giving a 64-bit hash
pub const DEFAULT_PHASH_SIZE: u32 = 8;

/// Default oversampling of the analysis image relative to the hash size
pub const DEFAULT_HIGHFREQ_FACTOR: u32 = 4;

/// Perceptual (DCT) hash of an image
pub fn phash(image: &RasterImage, hash_size: u32, highfreq_factor: u32) -> Result<ImageHash> {
    let image_size = analysis_size(hash_size, highfreq_factor)?;
    let gray = grayscale(image)?;
    let resized = resize(&gray, image_size, image_size)?;

    // Grayscale pixels carry the same value in every colour channel; read red
    let n = image_size as usize;
    let pixels = resized.pixels();
    let matrix = Array2::from_shape_fn((n, n), |(row, col)| f64::from(pixels[(row * n + col) * 4]));

    let coefficients = dct_2d(&matrix);

    let size = hash_size as usize;
    let low_freq: Vec<f64> = coefficients.slice(s![..size, ..size]).iter().copied().collect();
    let med = median(&low_freq);
    let bits: Vec<bool> = low_freq.iter().map(|&v| v > med).collect();

    Ok(ImageHash::from_bits(&bits))
}

/// Check that parameters give a whole number of hex nibbles and a
/// representable analysis size
pub fn validate_phash_params(hash_size: u32, highfreq_factor: u32) -> Result<()> {
    analysis_size(hash_size, highfreq_factor).map(|_| ())
}

/// Side of the square the image is resampled to before the DCT
fn analysis_size(hash_size: u32, highfreq_factor: u32) -> Result<u32> {
    if hash_size == 0 || hash_size % 2 != 0 {
        return Err(Error::InvalidParameter(format!(
            "phash size must be a positive even number, got {}",
            hash_size
        )));
    }
    if highfreq_factor == 0 {
        return Err(Error::InvalidParameter(
            "highfreq factor must be greater than zero".to_string(),
        ));
    }
    hash_size.checked_mul(highfreq_factor).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "phash analysis size {} x {} does not fit in 32 bits",
            hash_size, highfreq_factor
        ))
    })
}

/// Grayscale copy of `image`: luma in R, G and B, alpha preserved
pub(crate) fn grayscale(image: &RasterImage) -> Result<RasterImage> {
    let mut pixels = image.pixels().to_vec();
    for px in pixels.chunks_exact_mut(4) {
        let gray =
            f64::from(px[0]) * 0.299 + f64::from(px[1]) * 0.587 + f64::from(px[2]) * 0.114;
        // Store like a clamped byte array would: round half to even
        let gray = gray.clamp(0.0, 255.0).round_ties_even() as u8;
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
    RasterImage::new(image.width(), image.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, horizontal: bool) -> RasterImage {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let t = if horizontal {
                    x as f64 / width as f64
                } else {
                    y as f64 / height as f64
                };
                let v = (255.0 * t) as u8;
                pixels.extend_from_slice(&[v, 255 - v, v / 2, 255]);
            }
        }
        RasterImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_grayscale_weights() {
        let img = RasterImage::new(
            3,
            1,
            vec![255, 0, 0, 10, 0, 255, 0, 20, 255, 255, 255, 30],
        )
        .unwrap();
        let gray = grayscale(&img).unwrap();
        // 76.245, 149.685, 255
        assert_eq!(gray.pixels(), &[76, 76, 76, 10, 150, 150, 150, 20, 255, 255, 255, 30]);
    }

    #[test]
    fn test_grayscale_rounds_to_nearest() {
        // 0.299 * 10 + 0.114 * 5 = 3.56
        let img = RasterImage::new(1, 1, vec![10, 0, 5, 255]).unwrap();
        assert_eq!(grayscale(&img).unwrap().pixels()[0], 4);
    }

    #[test]
    fn test_phash_does_not_mutate_input() {
        let img = gradient(64, 48, true);
        let before = img.clone();
        let first = phash(&img, 8, 4).unwrap();
        assert_eq!(img, before);
        // Reusing the same buffer gives the same answer
        assert_eq!(phash(&img, 8, 4).unwrap(), first);
    }

    #[test]
    fn test_hash_length() {
        let img = gradient(50, 70, false);
        assert_eq!(phash(&img, 8, 4).unwrap().len(), 16);
        assert_eq!(phash(&img, 16, 4).unwrap().len(), 64);
        assert_eq!(phash(&img, 6, 3).unwrap().len(), 9);
    }

    #[test]
    fn test_median_split_sets_at_most_half_the_bits() {
        // Never more than half the coefficients sit strictly above the median
        let img = gradient(120, 90, true);
        let hash = phash(&img, 8, 4).unwrap();
        let ones: u32 = hash
            .as_str()
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|n| n.count_ones())
            .sum();
        assert!(ones <= 32, "{} bits set", ones);
    }

    #[test]
    fn test_rejects_bad_params() {
        let img = gradient(16, 16, true);
        assert!(matches!(phash(&img, 0, 4), Err(Error::InvalidParameter(_))));
        assert!(matches!(phash(&img, 7, 4), Err(Error::InvalidParameter(_))));
        assert!(matches!(phash(&img, 8, 0), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_overflowing_analysis_size() {
        let img = gradient(16, 16, true);
        assert!(matches!(
            phash(&img, 1 << 16, 1 << 16),
            Err(Error::InvalidParameter(_))
        ));
        assert!(validate_phash_params(u32::MAX - 1, 2).is_err());
        assert!(validate_phash_params(1 << 15, 1 << 16).is_ok());
    }
}
