//! Common axis fixtures.

use tl_common::AxisSpec;

/// Latitude band of the published grid: [-65, 65) at 1 degree.
pub const LAT_BAND_1DEG: AxisSpec = AxisSpec {
    min: -65.0,
    max: 65.0,
    step: 1.0,
};

/// Global longitudes: [-180, 180) at 1 degree.
pub const LON_GLOBAL_1DEG: AxisSpec = AxisSpec {
    min: -180.0,
    max: 180.0,
    step: 1.0,
};

/// Two cells starting at the equator.
pub const LAT_TWO_CELLS: AxisSpec = AxisSpec {
    min: 0.0,
    max: 2.0,
    step: 1.0,
};

/// Two cells starting at 10E.
pub const LON_TWO_CELLS: AxisSpec = AxisSpec {
    min: 10.0,
    max: 12.0,
    step: 1.0,
};

/// Coarse global grid: 18 x 36 cells of 10 degrees.
pub const LAT_GLOBAL_10DEG: AxisSpec = AxisSpec {
    min: -90.0,
    max: 90.0,
    step: 10.0,
};

/// Coarse global longitudes at 10 degrees.
pub const LON_GLOBAL_10DEG: AxisSpec = AxisSpec {
    min: -180.0,
    max: 180.0,
    step: 10.0,
};
