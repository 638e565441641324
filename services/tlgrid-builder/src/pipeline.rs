//! End-to-end build: provider, assembly, atomic output.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use climatology::{ClimatologyProvider, LinkeTableProvider};
use tl_common::TlError;
use tl_grid::{write_atomic, BuildConfig, GridAssembler, GridMetadata};
use tracing::{info, warn};

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub metadata: GridMetadata,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Pipeline stage that produced a build error, for operator messages.
///
/// Errors that carry no [`TlError`] are reported as `"build"`.
pub fn failure_stage(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<TlError>())
        .map(TlError::stage)
        .unwrap_or("build")
}

/// Build the grid described by `config` from the Linke table on disk.
pub fn run(config: &BuildConfig) -> Result<BuildSummary> {
    config.validate().context("Invalid build configuration")?;

    let provider = LinkeTableProvider::open(&config.table_path, config.interpolate)
        .with_context(|| format!("Failed to load Linke table from {:?}", config.table_path))?;

    run_with_provider(config, provider)
}

/// Build the grid described by `config` with an explicit provider.
///
/// Nothing is written unless every cell is sampled and the grid encodes.
pub fn run_with_provider<P: ClimatologyProvider>(
    config: &BuildConfig,
    provider: P,
) -> Result<BuildSummary> {
    let start = Instant::now();

    let grid = GridAssembler::new(provider)
        .assemble_config(config)
        .context("Grid assembly failed")?;

    let saturated: usize = grid.saturated_counts().iter().sum();
    if saturated > 0 {
        warn!(
            cells = saturated,
            scale = config.scale,
            "Turbidity values clipped at the quantization limit"
        );
    }

    let bytes_written = write_atomic(&config.output, &grid)
        .with_context(|| format!("Failed to write grid to {:?}", config.output))?;

    let summary = BuildSummary {
        output: config.output.clone(),
        metadata: *grid.metadata(),
        bytes_written,
        elapsed: start.elapsed(),
    };

    info!(
        output = %summary.output.display(),
        nlat = summary.metadata.nlat,
        nlon = summary.metadata.nlon,
        bytes = summary.bytes_written,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "Build complete"
    );

    Ok(summary)
}
