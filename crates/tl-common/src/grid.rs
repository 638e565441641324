//! Regular latitude/longitude grid geometry.

use crate::error::{TlError, TlResult};
use crate::time::{climatology_months, DEFAULT_REFERENCE_YEAR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relative tolerance when checking that `(max - min) / step` is integral.
const INTEGRAL_TOLERANCE: f64 = 1e-6;

/// Half-open axis domain `[min, max)` split into cells of width `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Number of cells along the axis.
    pub fn cell_count(&self) -> TlResult<usize> {
        cell_count("axis", self.min, self.max, self.step)
    }

    /// Cell-center coordinates, in increasing order.
    pub fn centers(&self) -> TlResult<Vec<f64>> {
        centers(self.min, self.max, self.step).map(|(values, _)| values)
    }

    /// Validate the axis, naming it in any error.
    pub fn validate(&self, axis: &str) -> TlResult<usize> {
        cell_count(axis, self.min, self.max, self.step)
    }

    /// Index of the cell containing `coord`, if it lies in `[min, max)`.
    pub fn index_of(&self, coord: f64) -> Option<usize> {
        let n = self.cell_count().ok()?;
        if !coord.is_finite() || coord < self.min || coord >= self.max {
            return None;
        }
        let idx = ((coord - self.min) / self.step).floor() as usize;
        Some(idx.min(n - 1))
    }
}

/// Compute the cell centers of `[min, max)` with spacing `step`.
///
/// Returns the centers and their count. The count is
/// `round((max - min) / step)` with ties rounded to even, and the first
/// center is `min + step / 2`.
pub fn centers(min: f64, max: f64, step: f64) -> TlResult<(Vec<f64>, usize)> {
    let n = cell_count("axis", min, max, step)?;
    let first = min + step / 2.0;
    let values = (0..n).map(|k| first + k as f64 * step).collect();
    Ok((values, n))
}

fn cell_count(axis: &str, min: f64, max: f64, step: f64) -> TlResult<usize> {
    if !(min.is_finite() && max.is_finite() && step.is_finite()) {
        return Err(TlError::invalid_domain(axis, min, max, step, "bounds and step must be finite"));
    }
    if step <= 0.0 {
        return Err(TlError::invalid_domain(axis, min, max, step, "step must be > 0"));
    }
    if max <= min {
        return Err(TlError::invalid_domain(axis, min, max, step, "max must be > min"));
    }

    let exact = (max - min) / step;
    let rounded = exact.round_ties_even();
    if rounded < 1.0 {
        return Err(TlError::invalid_domain(axis, min, max, step, "cell count must be positive"));
    }
    if (exact - rounded).abs() > INTEGRAL_TOLERANCE * rounded.max(1.0) {
        return Err(TlError::invalid_domain(
            axis,
            min,
            max,
            step,
            format!("(max - min) / step = {} is not an integer", exact),
        ));
    }

    Ok(rounded as usize)
}

/// Latitude and longitude axes plus the 12 climatological months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub latitude: AxisSpec,
    pub longitude: AxisSpec,
    /// First instant of each calendar month, January first.
    pub months: Vec<DateTime<Utc>>,
}

impl GridSpec {
    /// Create a grid spec using the default reference year.
    pub fn new(latitude: AxisSpec, longitude: AxisSpec) -> TlResult<Self> {
        Self::with_reference_year(latitude, longitude, DEFAULT_REFERENCE_YEAR)
    }

    /// Create a grid spec whose month timestamps fall in `year`.
    pub fn with_reference_year(latitude: AxisSpec, longitude: AxisSpec, year: i32) -> TlResult<Self> {
        latitude.validate("latitude")?;
        longitude.validate("longitude")?;
        Ok(Self {
            latitude,
            longitude,
            months: climatology_months(year)?,
        })
    }

    /// Grid dimensions as `(nlat, nlon)`.
    pub fn shape(&self) -> TlResult<(usize, usize)> {
        Ok((
            self.latitude.validate("latitude")?,
            self.longitude.validate("longitude")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_band_centers() {
        let (lats, n) = centers(-65.0, 65.0, 1.0).unwrap();
        assert_eq!(n, 130);
        assert_eq!(lats.len(), 130);
        assert_eq!(lats[0], -64.5);
        assert_eq!(lats[129], 64.5);
    }

    #[test]
    fn test_global_longitude_centers() {
        let (lons, n) = centers(-180.0, 180.0, 1.0).unwrap();
        assert_eq!(n, 360);
        assert_eq!(lons[0], -179.5);
        assert_eq!(*lons.last().unwrap(), 179.5);
    }

    #[test]
    fn test_centers_evenly_spaced_and_increasing() {
        let (values, n) = centers(10.0, 12.0, 0.25).unwrap();
        assert_eq!(n, 8);
        assert_eq!(values[0], 10.125);
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - 0.25).abs() < 1e-12);
        }
        assert!(*values.last().unwrap() < 12.0);
    }

    #[test]
    fn test_fractional_step_within_tolerance() {
        let (_, n) = centers(0.0, 1.0, 0.1).unwrap();
        assert_eq!(n, 10);
    }

    #[test]
    fn test_invalid_domains() {
        assert!(matches!(centers(5.0, 5.0, 1.0), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(5.0, 1.0, 1.0), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(0.0, 1.0, 0.0), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(0.0, 1.0, -1.0), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(0.0, 1.0, 0.3), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(0.0, 1.0, 4.0), Err(TlError::InvalidDomain { .. })));
        assert!(matches!(centers(f64::NAN, 1.0, 1.0), Err(TlError::InvalidDomain { .. })));
    }

    #[test]
    fn test_validate_names_axis() {
        let err = AxisSpec::new(1.0, 0.0, 1.0).validate("latitude").unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_index_of() {
        let axis = AxisSpec::new(-180.0, 180.0, 1.0);
        assert_eq!(axis.index_of(-180.0), Some(0));
        assert_eq!(axis.index_of(-179.5), Some(0));
        assert_eq!(axis.index_of(0.0), Some(180));
        assert_eq!(axis.index_of(179.99), Some(359));
        assert_eq!(axis.index_of(180.0), None);
        assert_eq!(axis.index_of(-181.0), None);
    }

    #[test]
    fn test_grid_spec_months() {
        let spec = GridSpec::new(
            AxisSpec::new(-65.0, 65.0, 1.0),
            AxisSpec::new(-180.0, 180.0, 1.0),
        )
        .unwrap();
        assert_eq!(spec.months.len(), 12);
        assert_eq!(spec.shape().unwrap(), (130, 360));
    }

    #[test]
    fn test_grid_spec_rejects_bad_axis() {
        let err = GridSpec::new(
            AxisSpec::new(65.0, -65.0, 1.0),
            AxisSpec::new(-180.0, 180.0, 1.0),
        )
        .unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }
}
