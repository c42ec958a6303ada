use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::processing::blockhash::{validate_bits, BlockhashMethod, DEFAULT_BLOCKHASH_BITS};
use crate::processing::fingerprint::HashParams;
use crate::processing::phash::{
    validate_phash_params, DEFAULT_HIGHFREQ_FACTOR, DEFAULT_PHASH_SIZE,
};

/// Hashes closer than this many bits are treated as the same image
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 8;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for fingerprinting images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blockhash grid size (hash has `block_bits²` bits)
    pub block_bits: u32,

    /// Block partitioning used by the blockhash
    pub blockhash_method: BlockhashMethod,

    /// Side of the low-frequency DCT block (hash has `phash_size²` bits)
    pub phash_size: u32,

    /// Analysis image is `phash_size * highfreq_factor` pixels square
    pub highfreq_factor: u32,

    /// Hamming distance below which two hashes count as the same image
    pub similarity_threshold: u32,

    /// Scale decoded images so their longest side is this many pixels before hashing
    pub prescale_max_side: Option<u32>,

    /// Maximum directory depth for scanning
    pub max_depth: Option<usize>,

    /// Number of threads to use for processing (0 = auto)
    pub threads: usize,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_bits: DEFAULT_BLOCKHASH_BITS,
            blockhash_method: BlockhashMethod::Bilinear,
            phash_size: DEFAULT_PHASH_SIZE,
            highfreq_factor: DEFAULT_HIGHFREQ_FACTOR,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            prescale_max_side: None,
            max_depth: None,
            threads: 0, // Auto
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check the hash parameters and limits make sense
    pub fn validate(&self) -> Result<()> {
        validate_bits(self.block_bits).map_err(|e| Error::Configuration(e.to_string()))?;
        validate_phash_params(self.phash_size, self.highfreq_factor)
            .map_err(|e| Error::Configuration(e.to_string()))?;

        if self.similarity_threshold == 0 {
            return Err(Error::Configuration(
                "similarity_threshold must be greater than zero".to_string(),
            ));
        }
        if self.prescale_max_side == Some(0) {
            return Err(Error::Configuration(
                "prescale_max_side must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The hashing parameters carried by this configuration
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            block_bits: self.block_bits,
            blockhash_method: self.blockhash_method,
            phash_size: self.phash_size,
            highfreq_factor: self.highfreq_factor,
        }
    }

    /// Worker threads to use, resolving 0 to the CPU count
    pub fn thread_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hash_params(), HashParams::default());
        assert!(config.thread_count() >= 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.block_bits = 7;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::default();
        config.highfreq_factor = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::default();
        config.phash_size = 1 << 16;
        config.highfreq_factor = 1 << 16;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::default();
        config.similarity_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.prescale_max_side = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.block_bits = 12;
        config.blockhash_method = BlockhashMethod::Even;
        config.prescale_max_side = Some(256);
        config.threads = 2;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "phash_size": 16 }"#).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.phash_size, 16);
        assert_eq!(loaded.block_bits, DEFAULT_BLOCKHASH_BITS);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "block_bits": 5 }"#).unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(Error::Configuration(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(Error::Serialization(_))
        ));
    }
}
