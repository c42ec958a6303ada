use anyhow::Context;
use clap::{Parser, Subcommand};
use image_fingerprint_core::config::LogLevel;
use image_fingerprint_core::discovery::discover_images;
use image_fingerprint_core::{
    fingerprint_file, logging, process_images, Config, Fingerprint, FingerprintResult,
    ImageHash,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "image-fingerprint")]
#[command(about = "Compute and compare perceptual image hashes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print blockhash and pHash for images or directories of images
    Hash {
        /// Image files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit one JSON object per image instead of columns
        #[arg(long)]
        json: bool,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write logs to a rotating file in this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// Hamming distance between two hashes or two images
    Compare {
        /// Hex hash or image path
        first: String,

        /// Hex hash or image path
        second: String,

        /// Bit difference below which the two count as near-duplicates
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        threshold: Option<u32>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "image-fingerprint.json")]
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Expand directories into the images they contain, keep files as given
fn collect_image_paths(paths: &[PathBuf], config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discover_images(&[path], config)?;
            info!("Found {} images in {}", found.len(), path.display());
            files.extend(found.into_iter().map(|f| f.path));
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn print_result(result: &FingerprintResult, json: bool) -> anyhow::Result<()> {
    match (&result.outcome, json) {
        (Ok(fp), false) => println!("{}  {}  {}", result.path.display(), fp.blockhash, fp.phash),
        (Ok(fp), true) => {
            let line = serde_json::json!({
                "path": result.path,
                "blockhash": fp.blockhash,
                "phash": fp.phash,
            });
            println!("{}", serde_json::to_string(&line)?);
        }
        (Err(e), false) => eprintln!("{}: {}", result.path.display(), e),
        (Err(e), true) => {
            let line = serde_json::json!({ "path": result.path, "error": e });
            println!("{}", serde_json::to_string(&line)?);
        }
    }
    Ok(())
}

fn run_hash(
    paths: Vec<PathBuf>,
    json: bool,
    verbose: u8,
    config: Option<PathBuf>,
    log_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = load_config(config.as_deref())?;

    // Set log level based on verbosity
    config.log_level = match verbose {
        0 => config.log_level,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    match log_dir {
        Some(dir) => logging::init_logger(&dir, config.log_level.into())?,
        None => env_logger::Builder::new()
            .filter_level(config.log_level.into())
            .parse_env(logging::LOG_ENV_VAR)
            .init(),
    }

    let files = collect_image_paths(&paths, &config)?;
    if files.is_empty() {
        warn!("No images found");
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let on_progress = |_: &FingerprintResult| pb.inc(1);

    let results = process_images(&files, &config, Some(&on_progress))?;
    pb.finish_and_clear();

    for result in &results {
        print_result(result, json)?;
    }

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} images could not be hashed", failed, results.len());
    }
    Ok(())
}

enum Operand {
    Hash(ImageHash),
    Image(Fingerprint),
}

fn parse_operand(arg: &str, config: &Config) -> anyhow::Result<Operand> {
    let path = Path::new(arg);
    if path.exists() {
        let fp = fingerprint_file(path, config)
            .with_context(|| format!("Failed to fingerprint {}", path.display()))?;
        return Ok(Operand::Image(fp));
    }
    let hash = arg
        .parse::<ImageHash>()
        .with_context(|| format!("'{}' is neither an image file nor a hex hash", arg))?;
    Ok(Operand::Hash(hash))
}

fn run_compare(
    first: &str,
    second: &str,
    threshold: Option<u32>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(logging::LOG_ENV_VAR)
        .init();

    let config = load_config(config.as_deref())?;
    let threshold = threshold.unwrap_or(config.similarity_threshold);

    match (parse_operand(first, &config)?, parse_operand(second, &config)?) {
        (Operand::Hash(a), Operand::Hash(b)) => {
            let distance = a.distance(&b)?;
            println!("distance: {}", distance);
            println!("similar: {}", distance < threshold);
        }
        (Operand::Image(a), Operand::Image(b)) => {
            let d = a.distance(&b)?;
            println!("blockhash: {}  {}  distance {}", a.blockhash, b.blockhash, d.blockhash);
            println!("phash:     {}  {}  distance {}", a.phash, b.phash, d.phash);
            println!("similar: {}", a.is_near_duplicate(&b, threshold)?);
        }
        _ => anyhow::bail!("Compare two hashes or two images, not one of each"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            paths,
            json,
            verbose,
            config,
            log_dir,
        } => run_hash(paths, json, verbose, config, log_dir),

        Commands::Compare {
            first,
            second,
            threshold,
            config,
        } => run_compare(&first, &second, threshold, config),

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
