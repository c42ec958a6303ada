//! # Block Mean Value Hash
//!
//! Spatial-domain perceptual hash. The image is normalised to a fixed square,
//! split into a `bits x bits` grid of blocks and every block's summed
//! intensity is compared against the median of its horizontal band.
//!
//! ## Process
//!
//! 1. Lanczos-resample to 256x256
//! 2. Sum `R + G + B` per block (fully transparent pixels count as white)
//! 3. Split the flattened block list into four equal bands and threshold each
//!    block against its band median
//! 4. Pack the bits into `bits² / 4` hex characters
//!
//! When `bits` does not divide the analysis size, pixels straddling a block
//! boundary are shared between up to four blocks with bilinear weights, so the
//! hash stays well defined for any even grid size.
//!
//! ## References
//!
//! - "Block Mean Value Based Image Perceptual Hashing" by Bian Yang, Fan Gu and Xiamu Niu
//! - The blockhash.io reference algorithm

use serde::{Deserialize, Serialize};

use super::median;
use super::resize::resize;
use crate::error::{Error, Result};
use crate::types::{ImageHash, RasterImage};

/// Side of the square every image is resampled to before hashing
pub const BLOCKHASH_ANALYSIS_SIZE: u32 = 256;

/// Default grid size, giving a 256-bit hash
pub const DEFAULT_BLOCKHASH_BITS: u32 = 16;

/// Intensity assigned to pixels with zero alpha (255 * 3)
const TRANSPARENT_VALUE: f64 = 765.0;

/// How blocks are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockhashMethod {
    /// Integer-sized blocks only; trailing pixels that don't fill a block are ignored
    Even,
    /// Exact partitioning, sharing boundary pixels between neighbouring blocks
    #[default]
    Bilinear,
}

/// Block hash with the default (bilinear) partitioning
pub fn blockhash(image: &RasterImage, bits: u32) -> Result<ImageHash> {
    blockhash_with_method(image, bits, BlockhashMethod::Bilinear)
}

/// Block hash with an explicit partitioning method
pub fn blockhash_with_method(
    image: &RasterImage,
    bits: u32,
    method: BlockhashMethod,
) -> Result<ImageHash> {
    validate_bits(bits)?;

    let resized = resize(image, BLOCKHASH_ANALYSIS_SIZE, BLOCKHASH_ANALYSIS_SIZE)?;
    let grid = match method {
        BlockhashMethod::Even => even_blocks(&resized, bits),
        BlockhashMethod::Bilinear => {
            if resized.width() % bits == 0 && resized.height() % bits == 0 {
                even_blocks(&resized, bits)
            } else {
                bilinear_blocks(&resized, bits)
            }
        }
    };

    Ok(ImageHash::from_bits(&grid.to_bits()))
}

/// Check that a grid size yields whole bands and whole hex nibbles
pub fn validate_bits(bits: u32) -> Result<()> {
    if bits == 0 || bits % 2 != 0 {
        return Err(Error::InvalidParameter(format!(
            "blockhash grid size must be a positive even number, got {}",
            bits
        )));
    }
    Ok(())
}

/// Accumulated block intensities for one hash computation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockGrid {
    /// Row-major `bits x bits` sums
    pub(crate) blocks: Vec<f64>,
    /// Pixel area covered by one block
    pub(crate) pixels_per_block: f64,
}

impl BlockGrid {
    /// Threshold each block against the median of its quarter of the list
    pub(crate) fn to_bits(&self) -> Vec<bool> {
        let half_block_value = self.pixels_per_block * 256.0 * 3.0 / 2.0;
        let band_size = self.blocks.len() / 4;

        self.blocks
            .chunks(band_size)
            .flat_map(|band| {
                let m = median(band);
                // Flat images put most blocks exactly on the median; resolve
                // those by brightness instead of emitting all zeros.
                band.iter()
                    .map(move |&v| v > m || ((v - m).abs() < 1.0 && m > half_block_value))
            })
            .collect()
    }
}

fn pixel_value(pixels: &[u8], offset: usize) -> f64 {
    if pixels[offset + 3] == 0 {
        TRANSPARENT_VALUE
    } else {
        f64::from(pixels[offset]) + f64::from(pixels[offset + 1]) + f64::from(pixels[offset + 2])
    }
}

pub(crate) fn even_blocks(data: &RasterImage, bits: u32) -> BlockGrid {
    let width = data.width() as usize;
    let bits = bits as usize;
    let block_width = width / bits;
    let block_height = data.height() as usize / bits;
    let pixels = data.pixels();

    let mut blocks = Vec::with_capacity(bits * bits);
    for y in 0..bits {
        for x in 0..bits {
            let mut total = 0.0;
            for iy in 0..block_height {
                let cy = y * block_height + iy;
                for ix in 0..block_width {
                    let cx = x * block_width + ix;
                    total += pixel_value(pixels, (cy * width + cx) * 4);
                }
            }
            blocks.push(total);
        }
    }

    BlockGrid {
        blocks,
        pixels_per_block: (block_width * block_height) as f64,
    }
}

/// Blocks a pixel row/column falls into, with the share going to each
struct Span {
    first: usize,
    second: usize,
    first_weight: f64,
    second_weight: f64,
}

impl Span {
    fn locate(pos: usize, len: usize, block_size: f64, even: bool, bits: usize) -> Self {
        let block = |v: f64| (v as usize).min(bits - 1);

        if even {
            let b = block((pos as f64 / block_size).floor());
            return Span {
                first: b,
                second: b,
                first_weight: 1.0,
                second_weight: 0.0,
            };
        }

        let modulo = (pos + 1) as f64 % block_size;
        let frac = modulo - modulo.floor();
        let whole = modulo - frac;
        let scaled = pos as f64 / block_size;

        // `whole` is zero on block boundaries and on the last row/column
        let (first, second) = if whole > 0.0 || pos + 1 == len {
            (block(scaled.floor()), block(scaled.floor()))
        } else {
            (block(scaled.floor()), block(scaled.ceil()))
        };

        Span {
            first,
            second,
            first_weight: 1.0 - frac,
            second_weight: frac,
        }
    }
}

pub(crate) fn bilinear_blocks(data: &RasterImage, bits: u32) -> BlockGrid {
    let width = data.width() as usize;
    let height = data.height() as usize;
    let bits = bits as usize;
    let even_x = width % bits == 0;
    let even_y = height % bits == 0;
    let block_width = width as f64 / bits as f64;
    let block_height = height as f64 / bits as f64;
    let pixels = data.pixels();

    let mut blocks = vec![0.0; bits * bits];
    for y in 0..height {
        let rows = Span::locate(y, height, block_height, even_y, bits);

        for x in 0..width {
            let value = pixel_value(pixels, (y * width + x) * 4);
            let cols = Span::locate(x, width, block_width, even_x, bits);

            blocks[rows.first * bits + cols.first] +=
                value * rows.first_weight * cols.first_weight;
            blocks[rows.first * bits + cols.second] +=
                value * rows.first_weight * cols.second_weight;
            blocks[rows.second * bits + cols.first] +=
                value * rows.second_weight * cols.first_weight;
            blocks[rows.second * bits + cols.second] +=
                value * rows.second_weight * cols.second_weight;
        }
    }

    BlockGrid {
        blocks,
        pixels_per_block: block_width * block_height,
    }
}
