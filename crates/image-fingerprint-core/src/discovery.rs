use log::warn;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{ImageFile, ImageFormat};

/// Discover images in the provided directories
pub fn discover_images<P: AsRef<Path>>(
    directories: &[P],
    config: &Config,
) -> Result<Vec<ImageFile>> {
    let paths: Vec<PathBuf> = directories
        .iter()
        .map(|dir| dir.as_ref().to_path_buf())
        .collect();

    paths
        .par_iter()
        .map(|dir| discover_images_in_directory(dir, config))
        .collect::<Vec<Result<Vec<ImageFile>>>>()
        .into_iter()
        .try_fold(Vec::new(), |mut acc, result| {
            acc.extend(result?);
            Ok(acc)
        })
}

/// Discover images in a single directory
fn discover_images_in_directory(directory: &Path, config: &Config) -> Result<Vec<ImageFile>> {
    if !directory.exists() {
        return Err(Error::FileNotFound(directory.to_path_buf()));
    }

    let max_depth = config.max_depth.unwrap_or(usize::MAX);

    let mut image_files = Vec::new();
    for entry in WalkDir::new(directory)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();

        let Some(format) = get_image_format(path) else {
            continue;
        };
        if !format.is_supported() {
            continue;
        }

        match fs::metadata(path) {
            Ok(metadata) => image_files.push(ImageFile {
                path: path.to_path_buf(),
                size: metadata.len(),
                format,
            }),
            // Log error but continue with other files
            Err(e) => warn!("Error reading metadata for {}: {}", path.display(), e),
        }
    }

    Ok(image_files)
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

/// Returns if the given path has a decodable image extension
pub fn is_image_path(path: &Path) -> bool {
    get_image_format(path).is_some_and(|format| format.is_supported())
}

// -- Tests --
