//! Parallel fingerprinting of many image files.
//!
//! Every file is decoded and hashed independently on a dedicated rayon pool.
//! A file that fails to decode or hash is logged and reported in its result
//! slot; it never aborts the rest of the batch.
//!
//! # Example
//! ```no_run
//! use image_fingerprint_core::processing::process_images;
//! use image_fingerprint_core::Config;
//! use std::path::PathBuf;
//!
//! let images = vec![PathBuf::from("image1.jpg"), PathBuf::from("image2.png")];
//! let results = process_images(&images, &Config::default(), None).unwrap();
//!
//! for result in results {
//!     println!("{}: {:?}", result.path.display(), result.outcome);
//! }
//! ```

use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::fingerprint::{fingerprint_file, Fingerprint};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::log_hash_error;

/// Called once per finished file, from whichever worker finished it
pub type ProgressCallback<'a> = &'a (dyn Fn(&FingerprintResult) + Sync);

/// Result of processing a single image
#[derive(Debug, Clone)]
pub struct FingerprintResult {
    /// Path to the image file
    pub path: PathBuf,
    /// Fingerprint, or the reason it couldn't be computed
    pub outcome: std::result::Result<Fingerprint, String>,
}

impl FingerprintResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

fn process_single_image(path: &Path, config: &Config) -> FingerprintResult {
    let start = Instant::now();

    let outcome = match fingerprint_file(path, config) {
        Ok(fp) => {
            debug!("Fingerprinted '{}' in {:.2?}", path.display(), start.elapsed());
            Ok(fp)
        }
        Err(e) => {
            log_hash_error(path, &e);
            Err(e.to_string())
        }
    };

    FingerprintResult {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Fingerprint `paths` in parallel. Results come back in input order.
pub fn process_images(
    paths: &[PathBuf],
    config: &Config,
    progress: Option<ProgressCallback<'_>>,
) -> Result<Vec<FingerprintResult>> {
    config.validate()?;

    let thread_limit = config.thread_count();
    info!(
        "Processing {} images using {} threads",
        paths.len(),
        thread_limit
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_limit)
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;

    let batch_start = Instant::now();
    let error_counter = AtomicUsize::new(0);

    let results: Vec<FingerprintResult> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = process_single_image(path, config);
                if !result.is_ok() {
                    error_counter.fetch_add(1, Ordering::Relaxed);
                }
                if let Some(callback) = progress {
                    callback(&result);
                }
                result
            })
            .collect()
    });

    let errors = error_counter.load(Ordering::Relaxed);
    info!(
        "Batch completed: {} successful, {} errors in {:.2?}",
        results.len() - errors,
        errors,
        batch_start.elapsed()
    );

    Ok(results)
}
