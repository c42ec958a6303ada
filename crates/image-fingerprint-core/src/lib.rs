//! Perceptual fingerprints for still images.
//!
//! This library provides the building blocks for near-duplicate detection:
//! - Lanczos resampling of RGBA rasters
//! - Block mean value hashing (blockhash)
//! - DCT based perceptual hashing (pHash)
//! - Hamming distance between hex hash strings
//! - File discovery and parallel batch fingerprinting
//!
//! # Example
//! ```no_run
//! use image_fingerprint_core::{blockhash, hamming_distance, phash, RasterImage};
//!
//! let a = RasterImage::open("a.jpg").unwrap();
//! let b = RasterImage::open("b.jpg").unwrap();
//!
//! let d = hamming_distance(
//!     blockhash(&a, 16).unwrap().as_str(),
//!     blockhash(&b, 16).unwrap().as_str(),
//! )
//! .unwrap();
//! println!("blockhash distance: {}", d);
//!
//! let p = phash(&a, 8, 4).unwrap();
//! println!("phash: {}", p);
//! ```

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use hamming::hamming_distance;
pub use processing::{
    blockhash, blockhash_with_method, fingerprint, fingerprint_file, phash, process_images,
    resize, scale_to_fit, BlockhashMethod, Fingerprint, FingerprintDistance, FingerprintResult,
    HashParams,
};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod discovery;
pub mod hamming;
pub mod logging;
pub mod processing;
pub mod types;
