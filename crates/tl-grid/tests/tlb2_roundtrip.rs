//! Integration test: assemble a grid, write it as TLB2 and read it back.
//!
//! Verifies that:
//! 1. Header fields decode to the assembled metadata
//! 2. The payload bytes survive unchanged
//! 3. Dequantized lookups land on the right cells

use climatology::LinkeTableProvider;
use test_utils::{
    assert_approx_eq, require_test_file, synthetic_turbidity, temp_test_dir, KeywordProvider,
    LAT_BAND_1DEG, LON_GLOBAL_1DEG,
};
use tl_common::AxisSpec;
use tl_grid::{decode, from_bytes, to_bytes, write_atomic, BuildConfig, GridAssembler};

#[test]
fn test_roundtrip_through_file() {
    let lat = AxisSpec::new(-30.0, 30.0, 2.0);
    let lon = AxisSpec::new(-60.0, 60.0, 3.0);
    let grid = GridAssembler::new(KeywordProvider)
        .assemble(&lat, &lon, 20)
        .unwrap();

    let dir = temp_test_dir();
    let path = dir.path().join("tl.bin");
    let size = write_atomic(&path, &grid).expect("Failed to write grid");

    let file = std::fs::File::open(&path).unwrap();
    let decoded = decode(std::io::BufReader::new(file)).expect("Failed to decode grid");

    assert_eq!(size as usize, 28 + 12 * 30 * 40);
    assert_eq!(decoded.metadata(), grid.metadata());
    assert_eq!(decoded.volume(), grid.volume());

    let meta = decoded.metadata();
    assert_eq!(meta.nlat, 30);
    assert_eq!(meta.nlon, 40);
    assert_eq!(meta.lat0, -29.0);
    assert_eq!(meta.lon0, -58.5);
    assert_eq!(meta.dlat, 2.0);
    assert_eq!(meta.dlon, 3.0);
    assert_eq!(meta.scale, 20);
}

#[test]
fn test_dequantized_lookup() {
    let grid = GridAssembler::new(KeywordProvider)
        .assemble(&LAT_BAND_1DEG, &LON_GLOBAL_1DEG, 20)
        .unwrap();
    let decoded = from_bytes(&to_bytes(&grid).unwrap()).unwrap();

    assert_eq!(decoded.metadata().nlat, 130);
    assert_eq!(decoded.metadata().nlon, 360);
    assert_eq!(decoded.metadata().lat0, -64.5);
    assert_eq!(decoded.metadata().lon0, -179.5);

    // Quantization error is at most half a step of 1/20.
    for (month, lat, lon) in [(0, 47.3_f64, 8.5_f64), (6, -33.9, 18.4), (11, 0.0, -179.9)] {
        let cell_lat = lat.floor() + 0.5;
        let cell_lon = lon.floor() + 0.5;
        let expected = synthetic_turbidity(cell_lat, cell_lon, month);
        let actual = decoded.turbidity_at(month, lat, lon).unwrap();
        assert_approx_eq!(actual, expected, 0.025 + 1e-9);
    }

    assert!(decoded.turbidity_at(0, 70.0, 0.0).is_none());
}

#[test]
fn test_config_driven_build() {
    let dir = temp_test_dir();
    let config = BuildConfig {
        latitude: AxisSpec::new(-10.0, 10.0, 5.0),
        longitude: AxisSpec::new(0.0, 20.0, 5.0),
        output: dir.path().join("out/tl.bin"),
        threads: Some(2),
        ..BuildConfig::default()
    };

    let grid = GridAssembler::new(KeywordProvider)
        .assemble_config(&config)
        .unwrap();
    write_atomic(&config.output, &grid).unwrap();

    let decoded = from_bytes(&std::fs::read(&config.output).unwrap()).unwrap();
    assert_eq!(decoded, grid);
    assert_eq!(decoded.metadata().nlat, 4);
    assert_eq!(decoded.metadata().nlon, 4);
}

/// Runs only when the full-resolution table is available locally.
#[test]
fn test_real_linke_table() {
    let path = require_test_file!("LinkeTurbidities.raw");
    let provider = LinkeTableProvider::open(&path, true).expect("Failed to load Linke table");

    let grid = GridAssembler::new(provider)
        .assemble(&AxisSpec::new(40.0, 50.0, 1.0), &AxisSpec::new(0.0, 10.0, 1.0), 20)
        .unwrap();

    // Central European turbidity sits well inside the quantized range.
    for &v in grid.volume() {
        assert!(v > 20 && v < 200, "unexpected quantized turbidity {}", v);
    }
}
