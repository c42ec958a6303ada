use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::blockhash::{blockhash_with_method, BlockhashMethod, DEFAULT_BLOCKHASH_BITS};
use super::phash::{phash, DEFAULT_HIGHFREQ_FACTOR, DEFAULT_PHASH_SIZE};
use super::resize::scale_to_fit;
use crate::config::Config;
use crate::error::Result;
use crate::types::{ImageHash, RasterImage};

/// Parameters for both hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    pub block_bits: u32,
    pub blockhash_method: BlockhashMethod,
    pub phash_size: u32,
    pub highfreq_factor: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            block_bits: DEFAULT_BLOCKHASH_BITS,
            blockhash_method: BlockhashMethod::Bilinear,
            phash_size: DEFAULT_PHASH_SIZE,
            highfreq_factor: DEFAULT_HIGHFREQ_FACTOR,
        }
    }
}

/// Both perceptual hashes of one image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub blockhash: ImageHash,
    pub phash: ImageHash,
}

/// Bit differences between two fingerprints, per algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintDistance {
    pub blockhash: u32,
    pub phash: u32,
}

impl Fingerprint {
    /// Hamming distance of each hash pair
    pub fn distance(&self, other: &Fingerprint) -> Result<FingerprintDistance> {
        Ok(FingerprintDistance {
            blockhash: self.blockhash.distance(&other.blockhash)?,
            phash: self.phash.distance(&other.phash)?,
        })
    }

    /// Both hashes agree to within `threshold` bits
    pub fn is_near_duplicate(&self, other: &Fingerprint, threshold: u32) -> Result<bool> {
        let d = self.distance(other)?;
        Ok(d.blockhash < threshold && d.phash < threshold)
    }
}

/// Compute both hashes for an in-memory image
pub fn fingerprint(image: &RasterImage, params: &HashParams) -> Result<Fingerprint> {
    Ok(Fingerprint {
        blockhash: blockhash_with_method(image, params.block_bits, params.blockhash_method)?,
        phash: phash(image, params.phash_size, params.highfreq_factor)?,
    })
}

/// Load an image file and fingerprint it according to `config`
pub fn fingerprint_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<Fingerprint> {
    let path = path.as_ref();
    let mut image = RasterImage::open(path)?;
    debug!(
        "Decoded '{}' ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    if let Some(max_side) = config.prescale_max_side {
        image = scale_to_fit(&image, max_side)?;
    }

    fingerprint(&image, &config.hash_params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn checker(size: u32, cell: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                let v = if on { 230 } else { 20 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RasterImage::new(size, size, pixels).unwrap()
    }

    #[test]
    fn test_fingerprint_lengths_follow_params() {
        let img = checker(96, 12);
        let fp = fingerprint(&img, &HashParams::default()).unwrap();
        assert_eq!(fp.blockhash.len(), 64);
        assert_eq!(fp.phash.len(), 16);

        let params = HashParams {
            block_bits: 8,
            phash_size: 16,
            ..HashParams::default()
        };
        let fp = fingerprint(&img, &params).unwrap();
        assert_eq!(fp.blockhash.len(), 16);
        assert_eq!(fp.phash.len(), 64);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let img = checker(64, 8);
        let fp = fingerprint(&img, &HashParams::default()).unwrap();
        let d = fp.distance(&fp).unwrap();
        assert_eq!(d, FingerprintDistance { blockhash: 0, phash: 0 });
        assert!(fp.is_near_duplicate(&fp, 1).unwrap());
    }

    #[test]
    fn test_mixed_params_are_not_comparable() {
        let img = checker(64, 8);
        let a = fingerprint(&img, &HashParams::default()).unwrap();
        let b = fingerprint(
            &img,
            &HashParams {
                block_bits: 8,
                ..HashParams::default()
            },
        )
        .unwrap();
        assert!(matches!(
            a.distance(&b),
            Err(Error::LengthMismatch { .. })
        ));
    }
}
