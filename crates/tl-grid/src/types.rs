//! Core types for the quantized grid.

use serde::{Deserialize, Serialize};
use tl_common::{AxisSpec, TlError, TlResult, MONTHS_PER_YEAR};

/// Header fields of a quantized turbidity grid.
///
/// Coordinates are kept at the `f32` precision they are stored with, so a
/// grid read back from disk compares equal to the one that was written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    /// Number of latitude cells
    pub nlat: usize,
    /// Number of longitude cells
    pub nlon: usize,
    /// Latitude of the first cell center
    pub lat0: f32,
    /// Longitude of the first cell center
    pub lon0: f32,
    /// Latitude step in degrees
    pub dlat: f32,
    /// Longitude step in degrees
    pub dlon: f32,
    /// Quantization factor: stored byte = round(turbidity * scale)
    pub scale: u32,
}

impl GridMetadata {
    /// Number of cells in one monthly plane.
    pub fn plane_len(&self) -> usize {
        self.nlat * self.nlon
    }

    /// Total payload length in bytes.
    pub fn volume_len(&self) -> usize {
        MONTHS_PER_YEAR * self.plane_len()
    }

    /// Latitude axis reconstructed from the first center and step.
    pub fn latitude_axis(&self) -> AxisSpec {
        axis_from_centers(self.lat0, self.dlat, self.nlat)
    }

    /// Longitude axis reconstructed from the first center and step.
    pub fn longitude_axis(&self) -> AxisSpec {
        axis_from_centers(self.lon0, self.dlon, self.nlon)
    }
}

fn axis_from_centers(first: f32, step: f32, count: usize) -> AxisSpec {
    let step = step as f64;
    let min = first as f64 - step / 2.0;
    AxisSpec::new(min, min + count as f64 * step, step)
}

/// Metadata plus the month-major byte volume.
///
/// The volume is laid out as `volume[m * nlat * nlon + i * nlon + j]` and
/// cannot be modified once the grid is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedGrid {
    metadata: GridMetadata,
    volume: Vec<u8>,
}

impl QuantizedGrid {
    /// Create a grid, checking the volume length against the metadata.
    pub fn new(metadata: GridMetadata, volume: Vec<u8>) -> TlResult<Self> {
        let expected = metadata.volume_len();
        if volume.len() != expected {
            return Err(TlError::invalid_format(format!(
                "volume has {} bytes, expected {} for {}x{}x{}",
                volume.len(),
                expected,
                MONTHS_PER_YEAR,
                metadata.nlat,
                metadata.nlon
            )));
        }
        Ok(Self { metadata, volume })
    }

    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    /// The raw month-major payload.
    pub fn volume(&self) -> &[u8] {
        &self.volume
    }

    /// Quantized value for month `month` at latitude index `i`, longitude index `j`.
    pub fn value(&self, month: usize, i: usize, j: usize) -> Option<u8> {
        let meta = &self.metadata;
        if month >= MONTHS_PER_YEAR || i >= meta.nlat || j >= meta.nlon {
            return None;
        }
        self.volume
            .get(month * meta.plane_len() + i * meta.nlon + j)
            .copied()
    }

    /// Dequantized turbidity for the cell containing `(latitude, longitude)`.
    ///
    /// `month` is zero-based (January = 0). Returns `None` outside the grid.
    pub fn turbidity_at(&self, month: usize, latitude: f64, longitude: f64) -> Option<f64> {
        if self.metadata.scale == 0 {
            return None;
        }
        let i = self.metadata.latitude_axis().index_of(latitude)?;
        let j = self.metadata.longitude_axis().index_of(longitude)?;
        let raw = self.value(month, i, j)?;
        Some(raw as f64 / self.metadata.scale as f64)
    }

    /// Count of cells per month stored at the saturation limit (255).
    pub fn saturated_counts(&self) -> [usize; MONTHS_PER_YEAR] {
        let plane = self.metadata.plane_len();
        let mut counts = [0usize; MONTHS_PER_YEAR];
        if plane == 0 {
            return counts;
        }
        for (month, chunk) in self.volume.chunks(plane).enumerate() {
            counts[month] = chunk.iter().filter(|&&v| v == u8::MAX).count();
        }
        counts
    }
}
