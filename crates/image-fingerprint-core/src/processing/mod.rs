// Hash algorithms
pub mod blockhash;
mod dct;
pub mod phash;
pub mod resize;

// Combined hashing and batch processing
pub mod batch_processor;
pub mod fingerprint;

// Reexport core functionality
pub use batch_processor::{process_images, FingerprintResult, ProgressCallback};
pub use blockhash::{blockhash, blockhash_with_method, BlockhashMethod};
pub use fingerprint::{fingerprint, fingerprint_file, Fingerprint, FingerprintDistance, HashParams};
pub use phash::phash;
pub use resize::{resize, scale_to_fit};

/// Median of a list; the mean of the two middle values for even lengths
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    if len % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
