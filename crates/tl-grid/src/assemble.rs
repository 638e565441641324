//! Grid assembly: sample, quantize and lay out every cell.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use climatology::{ClimatologyProvider, ClimatologySampler};
use rayon::prelude::*;
use tl_common::time::DEFAULT_REFERENCE_YEAR;
use tl_common::{AxisSpec, GridSpec, TlError, TlResult, MONTHS_PER_YEAR};
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::quantize::quantize_series;
use crate::types::{GridMetadata, QuantizedGrid};

/// Emit a progress event every this many completed latitude rows.
const PROGRESS_ROWS: usize = 10;

/// Builds a [`QuantizedGrid`] from a climatology provider.
///
/// Cells are independent, so they are sampled on a rayon pool. Each cell's
/// 12 bytes are collected in cell order and then written to fixed volume
/// positions, which keeps the output identical to a sequential run.
pub struct GridAssembler<P> {
    sampler: ClimatologySampler<P>,
    threads: Option<usize>,
    reference_year: i32,
}

impl<P: ClimatologyProvider> GridAssembler<P> {
    pub fn new(provider: P) -> Self {
        Self {
            sampler: ClimatologySampler::new(provider),
            threads: None,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }

    /// Use a dedicated pool of `threads` workers; `Some(1)` runs sequentially.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn sampler(&self) -> &ClimatologySampler<P> {
        &self.sampler
    }

    /// Assemble using the axes, scale and threading from a build config.
    pub fn assemble_config(self, config: &BuildConfig) -> TlResult<QuantizedGrid> {
        config.validate()?;
        self.with_threads(config.threads)
            .with_reference_year(config.reference_year)
            .assemble(&config.latitude, &config.longitude, config.scale)
    }

    /// Sample and quantize every cell of the `latitude` x `longitude` grid.
    ///
    /// Any cell failure aborts the whole assembly; no partial grid is
    /// returned.
    pub fn assemble(
        &self,
        latitude: &AxisSpec,
        longitude: &AxisSpec,
        scale: u32,
    ) -> TlResult<QuantizedGrid> {
        let spec = GridSpec::with_reference_year(*latitude, *longitude, self.reference_year)?;
        let lats = latitude.centers()?;
        let lons = longitude.centers()?;
        let (nlat, nlon) = (lats.len(), lons.len());

        info!(
            nlat,
            nlon,
            scale,
            lat0 = lats[0],
            lon0 = lons[0],
            "Assembling turbidity grid"
        );
        let start = Instant::now();

        let cells = match self.threads {
            Some(1) => self.sample_sequential(&spec.months, &lats, &lons, scale)?,
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| TlError::Config(format!("failed to build worker pool: {}", e)))?;
                pool.install(|| self.sample_parallel(&spec.months, &lats, &lons, scale))?
            }
            None => self.sample_parallel(&spec.months, &lats, &lons, scale)?,
        };

        let plane = nlat * nlon;
        let mut volume = vec![0u8; MONTHS_PER_YEAR * plane];
        for (cell, values) in cells.iter().enumerate() {
            for (month, &value) in values.iter().enumerate() {
                volume[month * plane + cell] = value;
            }
        }

        let metadata = GridMetadata {
            nlat,
            nlon,
            lat0: lats[0] as f32,
            lon0: lons[0] as f32,
            dlat: latitude.step as f32,
            dlon: longitude.step as f32,
            scale,
        };

        info!(
            cells = plane,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Turbidity grid assembled"
        );

        QuantizedGrid::new(metadata, volume)
    }

    fn sample_cell(
        &self,
        months: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
        scale: u32,
    ) -> TlResult<[u8; MONTHS_PER_YEAR]> {
        let values = self.sampler.sample(months, latitude, longitude)?;
        quantize_series(&values, scale, latitude, longitude)
    }

    fn sample_sequential(
        &self,
        months: &[DateTime<Utc>],
        lats: &[f64],
        lons: &[f64],
        scale: u32,
    ) -> TlResult<Vec<[u8; MONTHS_PER_YEAR]>> {
        let mut cells = Vec::with_capacity(lats.len() * lons.len());
        for (i, &lat) in lats.iter().enumerate() {
            for &lon in lons {
                cells.push(self.sample_cell(months, lat, lon, scale)?);
            }
            report_row(i + 1, lats.len());
        }
        Ok(cells)
    }

    fn sample_parallel(
        &self,
        months: &[DateTime<Utc>],
        lats: &[f64],
        lons: &[f64],
        scale: u32,
    ) -> TlResult<Vec<[u8; MONTHS_PER_YEAR]>> {
        let nlon = lons.len();
        let completed = AtomicUsize::new(0);

        (0..lats.len() * nlon)
            .into_par_iter()
            .map(|cell| {
                let result = self.sample_cell(months, lats[cell / nlon], lons[cell % nlon], scale);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % nlon == 0 {
                    report_row(done / nlon, lats.len());
                }
                result
            })
            .collect()
    }
}

fn report_row(rows_done: usize, nlat: usize) {
    if rows_done % PROGRESS_ROWS == 0 || rows_done == nlat {
        info!(rows_done, nlat, "Assembly progress");
    } else {
        debug!(rows_done, nlat, "Row complete");
    }
}
