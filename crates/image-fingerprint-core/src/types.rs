use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hamming::hamming_distance;

/// An RGBA raster, row-major with no padding.
///
/// The buffer length is always `width * height * 4`; the constructors are the
/// only way to build one, so hashing code can index without bounds surprises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA buffer, checking it against the declared dimensions
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(Error::InvalidImageBuffer {
                width,
                height,
                expected,
                len: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert any decoded image to RGBA
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        Self::try_from(img.to_rgba8())
    }

    /// Decode an encoded image blob, guessing the format from its magic bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::io::Reader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Self::from_dynamic(&img)
    }

    /// Load and decode an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let img = image::open(path)?;
        Self::from_dynamic(&img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

impl TryFrom<RgbaImage> for RasterImage {
    type Error = Error;

    fn try_from(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }
}

impl From<RasterImage> for RgbaImage {
    fn from(raster: RasterImage) -> Self {
        // Dimensions were validated on construction, so this cannot come back empty
        RgbaImage::from_raw(raster.width, raster.height, raster.pixels)
            .unwrap_or_else(|| RgbaImage::new(0, 0))
    }
}

/// A perceptual hash as a lowercase hex string.
///
/// Hashes produced with different grid/hash sizes have different lengths and
/// cannot be compared with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageHash(String);

impl ImageHash {
    /// Pack bits four at a time, high bit first, into hex nibbles
    pub(crate) fn from_bits(bits: &[bool]) -> Self {
        let hex = bits
            .chunks(4)
            .map(|nibble| {
                let value = nibble
                    .iter()
                    .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
                char::from_digit(value, 16).unwrap_or('0')
            })
            .collect();
        ImageHash(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of hex characters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of bits carried by the hash
    pub fn bit_len(&self) -> usize {
        self.0.len() * 4
    }

    /// Calculate the Hamming distance between two hashes
    pub fn distance(&self, other: &ImageHash) -> Result<u32> {
        hamming_distance(&self.0, &other.0)
    }

    /// Check if two images are perceptually similar: fewer than `threshold` differing bits
    pub fn is_similar(&self, other: &ImageHash, threshold: u32) -> Result<bool> {
        Ok(self.distance(other)? < threshold)
    }
}

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ImageHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHash(s.to_string()));
        }
        Ok(ImageHash(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for ImageHash {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ImageHash> for String {
    fn from(hash: ImageHash) -> Self {
        hash.0
    }
}

/// Supported image formats
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format can be decoded
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Representation of an image file found on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    /// Full path to the image file
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Image format
    pub format: ImageFormat,
}
