mod common;

use common::{ripples, save, waves};
use image_fingerprint_core::discovery::{discover_images, is_image_path};
use image_fingerprint_core::{process_images, Config, ImageFormat};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_discover_and_fingerprint_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("holiday").join("day1");
    fs::create_dir_all(&nested).unwrap();

    save(dir.path(), "waves.png", &waves(160, 120));
    save(&nested, "ripples.png", &ripples(160, 120));
    fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    let config = Config::default();
    let found = discover_images(&[dir.path()], &config).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|f| f.format == ImageFormat::Png));
    assert!(found.iter().all(|f| f.size > 0));

    let paths: Vec<PathBuf> = found.into_iter().map(|f| f.path).collect();
    let results = process_images(&paths, &config, None).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_ok()));
}

#[test]
fn test_depth_limit_skips_nested_images() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeper");
    fs::create_dir(&nested).unwrap();

    let top = save(dir.path(), "top.png", &waves(64, 48));
    save(&nested, "nested.png", &waves(64, 48));

    let mut config = Config::default();
    config.max_depth = Some(1);

    let found = discover_images(&[dir.path()], &config).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, top);
}

#[test]
fn test_missing_directory_is_an_error() {
    let config = Config::default();
    assert!(discover_images(&["/path/that/does/not/exist"], &config).is_err());
}

#[test]
fn test_extension_filter() {
    assert!(is_image_path(std::path::Path::new("photo.JPG")));
    assert!(is_image_path(std::path::Path::new("scan.tif")));
    assert!(!is_image_path(std::path::Path::new("raw.cr2")));
}
