//! Configuration for a grid build.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tl_common::time::DEFAULT_REFERENCE_YEAR;
use tl_common::{AxisSpec, TlError, TlResult};

use crate::quantize::DEFAULT_SCALE;

/// Immutable description of one grid build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Latitude domain, half-open.
    pub latitude: AxisSpec,

    /// Longitude domain, half-open.
    pub longitude: AxisSpec,

    /// Quantization factor (1-255).
    pub scale: u32,

    /// Destination of the TLB2 file.
    pub output: PathBuf,

    /// Raw Linke turbidity table (2160 x 4320 x 12 bytes).
    pub table_path: PathBuf,

    /// Interpolate between mid-month values instead of taking the
    /// monthly value directly.
    pub interpolate: bool,

    /// Worker threads for assembly. `None` uses the global rayon pool.
    pub threads: Option<usize>,

    /// Year used for the monthly timestamps.
    pub reference_year: i32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            latitude: AxisSpec::new(-65.0, 65.0, 1.0),
            longitude: AxisSpec::new(-180.0, 180.0, 1.0),
            scale: DEFAULT_SCALE,
            output: PathBuf::from("./dist/tl_1deg_uint8.bin"),
            table_path: PathBuf::from("./data/LinkeTurbidities.raw"),
            interpolate: true,
            threads: None,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl BuildConfig {
    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `TLGRID_*` environment variables on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
        }

        if let Some(v) = parsed("TLGRID_LAT_MIN") {
            self.latitude.min = v;
        }
        if let Some(v) = parsed("TLGRID_LAT_MAX") {
            self.latitude.max = v;
        }
        if let Some(v) = parsed("TLGRID_DLAT") {
            self.latitude.step = v;
        }
        if let Some(v) = parsed("TLGRID_LON_MIN") {
            self.longitude.min = v;
        }
        if let Some(v) = parsed("TLGRID_LON_MAX") {
            self.longitude.max = v;
        }
        if let Some(v) = parsed("TLGRID_DLON") {
            self.longitude.step = v;
        }
        if let Some(v) = parsed("TLGRID_SCALE") {
            self.scale = v;
        }
        if let Ok(val) = std::env::var("TLGRID_OUTPUT") {
            self.output = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TLGRID_TABLE_PATH") {
            self.table_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TLGRID_INTERPOLATE") {
            self.interpolate = val.to_lowercase() == "true" || val == "1";
        }
        if let Some(v) = parsed("TLGRID_THREADS") {
            self.threads = Some(v);
        }

        self
    }

    /// Validate the configuration before any sampling starts.
    pub fn validate(&self) -> TlResult<()> {
        self.latitude.validate("latitude")?;
        self.longitude.validate("longitude")?;

        if self.scale == 0 || self.scale > u8::MAX as u32 {
            return Err(TlError::Config(format!(
                "scale must be 1-255, got {}",
                self.scale
            )));
        }

        if self.threads == Some(0) {
            return Err(TlError::Config("threads must be > 0".to_string()));
        }

        if self.output.as_os_str().is_empty() {
            return Err(TlError::Config("output path must not be empty".to_string()));
        }

        Ok(())
    }

    /// Grid dimensions as `(nlat, nlon)`.
    pub fn shape(&self) -> TlResult<(usize, usize)> {
        Ok((
            self.latitude.validate("latitude")?,
            self.longitude.validate("longitude")?,
        ))
    }
}
