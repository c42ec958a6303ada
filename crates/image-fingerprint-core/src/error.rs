use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the image-fingerprint library
#[derive(Error, Debug)]
pub enum Error {
    /// Two hashes of different length were compared
    #[error("Can't compare hashes with different length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Hash string contains something other than hex digits
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Pixel buffer does not match the declared dimensions
    #[error("Invalid image buffer: {width}x{height} needs {expected} bytes, got {len}")]
    InvalidImageBuffer {
        width: u32,
        height: u32,
        expected: usize,
        len: usize,
    },

    /// Hash or resize parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Config (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
