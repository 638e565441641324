//! Integration tests: load a raw Linke table from disk and sample it.

use std::io::Write;

use climatology::{ClimatologySampler, LinkeTable, LinkeTableProvider};
use tl_common::{climatology_months, TlError};

/// 18 rows x 36 cols (10 degree cells); byte = row + col + 2 * month.
fn write_table(dir: &std::path::Path) -> std::path::PathBuf {
    let mut data = Vec::with_capacity(18 * 36 * 12);
    for row in 0..18 {
        for col in 0..36 {
            for month in 0..12 {
                data.push((row + col + 2 * month) as u8);
            }
        }
    }
    let path = dir.join("linke.raw");
    let mut file = std::fs::File::create(&path).expect("Failed to create table file");
    file.write_all(&data).expect("Failed to write table");
    path
}

#[test]
fn test_sample_from_file_table() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_table(temp_dir.path());

    let table = LinkeTable::from_file(&path, 18, 36).expect("Failed to load table");
    let sampler = ClimatologySampler::new(LinkeTableProvider::new(table, false));
    let months = climatology_months(2000).unwrap();

    // 85N is row 0, 175W is col 0
    let values = sampler.sample(&months, 85.0, -175.0).unwrap();
    let expected: Vec<f64> = (0..12).map(|m| (2 * m) as f64 / 20.0).collect();
    assert_eq!(values, expected);

    // 5S is row 9, 5E is col 18
    let values = sampler.sample(&months, -5.0, 5.0).unwrap();
    assert_eq!(values[0], 27.0 / 20.0);
    assert_eq!(values[11], 49.0 / 20.0);
}

#[test]
fn test_out_of_range_reports_coordinate() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_table(temp_dir.path());

    let table = LinkeTable::from_file(&path, 18, 36).unwrap();
    let sampler = ClimatologySampler::new(LinkeTableProvider::new(table, true));
    let months = climatology_months(2000).unwrap();

    let err = sampler.sample(&months, 120.0, 0.0).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("lat=120"), "{}", msg);
    assert!(msg.contains("out of range"), "{}", msg);
}

#[test]
fn test_wrong_shape_rejected() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_table(temp_dir.path());
    assert!(LinkeTable::from_file(&path, 2160, 4320).is_err());
}

#[test]
fn test_missing_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("absent.raw");
    let err = LinkeTableProvider::open(&path, true).unwrap_err();
    assert!(matches!(err, TlError::Config(_)));
    assert_eq!(err.stage(), "configuration");
    assert!(err.to_string().contains("absent.raw"));
}
