//! Worldwide Linke turbidity table lookup.
//!
//! The table is a `rows x cols x 12` array of bytes, stored row-major with
//! the month as the fastest-varying index. Row 0 is the northernmost band
//! (90N), column 0 the westernmost (180W), and each byte holds the monthly
//! turbidity multiplied by [`LINKE_SCALE`].

use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use tl_common::{TlError, TlResult, MONTHS_PER_YEAR};
use tracing::{info, trace};

use crate::provider::{ClimatologyProvider, CoordinateArgs, ProviderError};

/// Rows of the standard 5 arc-minute table.
pub const LINKE_ROWS: usize = 2160;

/// Columns of the standard 5 arc-minute table.
pub const LINKE_COLS: usize = 4320;

/// Stored bytes are turbidity times this factor.
pub const LINKE_SCALE: f64 = 20.0;

/// Slack allowed past the table edge before a coordinate is rejected.
const EDGE_SLACK: f64 = 0.500001;

/// Days per month in a non-leap year.
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// In-memory Linke turbidity table.
#[derive(Debug, Clone)]
pub struct LinkeTable {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl LinkeTable {
    /// Wrap raw table bytes, checking the length against the shape.
    pub fn from_bytes(rows: usize, cols: usize, data: Vec<u8>) -> TlResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(TlError::Config(format!(
                "Linke table shape must be non-empty, got {}x{}",
                rows, cols
            )));
        }
        let expected = rows * cols * MONTHS_PER_YEAR;
        if data.len() != expected {
            return Err(TlError::Config(format!(
                "Linke table has {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                rows,
                cols,
                MONTHS_PER_YEAR
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Load a raw table dump from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, rows: usize, cols: usize) -> TlResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            TlError::Config(format!("cannot read Linke table {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), bytes = data.len(), rows, cols, "Loaded Linke turbidity table");
        Self::from_bytes(rows, cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The 12 raw monthly bytes at a table cell.
    pub fn monthly(&self, row: usize, col: usize) -> &[u8] {
        let start = (row * self.cols + col) * MONTHS_PER_YEAR;
        &self.data[start..start + MONTHS_PER_YEAR]
    }

    /// Table row containing `latitude`.
    pub fn row_index(&self, latitude: f64) -> Result<usize, ProviderError> {
        degrees_to_index(latitude, "latitude", 90.0, -90.0, self.rows)
    }

    /// Table column containing `longitude`.
    pub fn col_index(&self, longitude: f64) -> Result<usize, ProviderError> {
        degrees_to_index(longitude, "longitude", -180.0, 180.0, self.cols)
    }
}

/// Map a coordinate onto a table index along one axis.
fn degrees_to_index(
    degrees: f64,
    coordinate: &'static str,
    input_min: f64,
    input_max: f64,
    count: usize,
) -> Result<usize, ProviderError> {
    let out_of_range = || ProviderError::OutOfRange {
        coordinate,
        value: degrees,
        min: input_min,
        max: input_max,
    };
    if !degrees.is_finite() {
        return Err(out_of_range());
    }

    let scale = count as f64 / (input_max - input_min);
    let center = input_min + 1.0 / scale / 2.0;
    let last = (count - 1) as f64;
    let index = (degrees - center) * scale;

    if index > last {
        if index - last <= EDGE_SLACK {
            Ok(count - 1)
        } else {
            Err(out_of_range())
        }
    } else if index < 0.0 {
        if -index <= EDGE_SLACK {
            Ok(0)
        } else {
            Err(out_of_range())
        }
    } else {
        Ok(index.round_ties_even() as usize)
    }
}

/// Day-of-year positions of each mid-month, padded with the previous
/// December and the following January.
fn month_middles(leap: bool) -> [f64; 14] {
    let mut days = MONTH_DAYS;
    let mut year_days = 365.0;
    if leap {
        days[1] += 1;
        year_days = 366.0;
    }

    let mut middles = [0.0; 14];
    middles[0] = -(MONTH_DAYS[11] as f64) / 2.0;
    let mut cumulative = 0.0;
    for (k, &d) in days.iter().enumerate() {
        cumulative += d as f64;
        middles[k + 1] = cumulative - d as f64 / 2.0;
    }
    middles[13] = year_days + MONTH_DAYS[0] as f64 / 2.0;
    middles
}

/// Piecewise-linear interpolation with flat extrapolation.
///
/// Evaluated as `slope * (x - xp[j]) + fp[j]` with exact hits returning
/// `fp[j]`, the form standard numerical libraries use. Month starts
/// regularly land on half-way bytes, where a one-ulp difference flips the
/// quantized value.
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    // xp[j] <= x < xp[j + 1]
    let j = xp.partition_point(|&v| v <= x) - 1;
    if xp[j] == x {
        return fp[j];
    }
    let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
    slope * (x - xp[j]) + fp[j]
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Turbidity from the Linke table, optionally interpolated between
/// mid-month values.
#[derive(Debug, Clone)]
pub struct LinkeTableProvider {
    table: LinkeTable,
    interpolate: bool,
}

impl LinkeTableProvider {
    pub fn new(table: LinkeTable, interpolate: bool) -> Self {
        Self { table, interpolate }
    }

    /// Load the standard 2160x4320 table from a raw dump.
    pub fn open<P: AsRef<Path>>(path: P, interpolate: bool) -> TlResult<Self> {
        let table = LinkeTable::from_file(path, LINKE_ROWS, LINKE_COLS)?;
        Ok(Self::new(table, interpolate))
    }

    pub fn table(&self) -> &LinkeTable {
        &self.table
    }

    fn lookup(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        let row = self.table.row_index(latitude)?;
        let col = self.table.col_index(longitude)?;
        let monthly = self.table.monthly(row, col);
        trace!(latitude, longitude, row, col, "Linke table lookup");

        if !self.interpolate {
            return Ok(times
                .iter()
                .map(|t| monthly[t.month0() as usize] as f64 / LINKE_SCALE)
                .collect());
        }

        let mut padded = [0.0; 14];
        padded[0] = monthly[MONTHS_PER_YEAR - 1] as f64;
        for (k, &v) in monthly.iter().enumerate() {
            padded[k + 1] = v as f64;
        }
        padded[13] = monthly[0] as f64;

        let leap_middles = month_middles(true);
        let common_middles = month_middles(false);

        Ok(times
            .iter()
            .map(|t| {
                let middles = if is_leap_year(t.year()) {
                    &leap_middles
                } else {
                    &common_middles
                };
                interp(t.ordinal() as f64, middles, &padded) / LINKE_SCALE
            })
            .collect())
    }
}

impl ClimatologyProvider for LinkeTableProvider {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        self.lookup(times, args.latitude, args.longitude)
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        self.lookup(times, latitude, longitude)
    }
}
