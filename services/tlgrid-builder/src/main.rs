//! Turbidity grid builder.
//!
//! Samples the monthly Linke turbidity climatology on a regular lat/lon
//! grid and writes the quantized TLB2 file consumed by clear-sky models.

use std::path::PathBuf;

use clap::Parser;
use tl_grid::BuildConfig;
use tlgrid_builder::{failure_stage, load_config_file, run, LoggingConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tlgrid-builder")]
#[command(about = "Build a compact monthly Linke turbidity grid")]
struct Args {
    /// YAML configuration file (build and logging sections)
    #[arg(short, long, env = "TLGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Output TLB2 file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raw Linke turbidity table (2160 x 4320 x 12 bytes)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Southern latitude bound (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    lat_min: Option<f64>,

    /// Northern latitude bound (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    lat_max: Option<f64>,

    /// Latitude step in degrees
    #[arg(long)]
    dlat: Option<f64>,

    /// Western longitude bound (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    lon_min: Option<f64>,

    /// Eastern longitude bound (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    lon_max: Option<f64>,

    /// Longitude step in degrees
    #[arg(long)]
    dlon: Option<f64>,

    /// Quantization factor: stored byte = round(turbidity * scale)
    #[arg(long)]
    scale: Option<u32>,

    /// Worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Use the raw monthly value instead of interpolating mid-month values
    #[arg(long)]
    no_interpolate: bool,

    /// Log level
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, mut config: BuildConfig) -> BuildConfig {
        if let Some(v) = &self.output {
            config.output = v.clone();
        }
        if let Some(v) = &self.table {
            config.table_path = v.clone();
        }
        if let Some(v) = self.lat_min {
            config.latitude.min = v;
        }
        if let Some(v) = self.lat_max {
            config.latitude.max = v;
        }
        if let Some(v) = self.dlat {
            config.latitude.step = v;
        }
        if let Some(v) = self.lon_min {
            config.longitude.min = v;
        }
        if let Some(v) = self.lon_max {
            config.longitude.max = v;
        }
        if let Some(v) = self.dlon {
            config.longitude.step = v;
        }
        if let Some(v) = self.scale {
            config.scale = v;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if self.no_interpolate {
            config.interpolate = false;
        }
        config
    }
}

fn init_tracing(logging: &LoggingConfig, args: &Args) {
    let level = args.log_level.as_deref().unwrap_or(&logging.level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if args.json || logging.format == "json" {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => match load_config_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error [configuration]: {:#}", e);
                std::process::exit(1);
            }
        },
        None => Default::default(),
    };

    init_tracing(&file_config.logging, &args);

    let config = args.apply(file_config.build.with_env_overrides());
    info!(
        output = %config.output.display(),
        table = %config.table_path.display(),
        latitude = ?config.latitude,
        longitude = ?config.longitude,
        scale = config.scale,
        interpolate = config.interpolate,
        "Starting turbidity grid build"
    );

    match run(&config) {
        Ok(summary) => {
            println!(
                "Wrote {} with {} x {} cells; lat0={} dlat={} lon0={} dlon={}",
                summary.output.display(),
                summary.metadata.nlat,
                summary.metadata.nlon,
                summary.metadata.lat0,
                summary.metadata.dlat,
                summary.metadata.lon0,
                summary.metadata.dlon
            );
        }
        Err(e) => {
            let stage = failure_stage(&e);
            error!(stage, error = %format!("{:#}", e), "Build failed");
            eprintln!("Error [{}]: {:#}", stage, e);
            std::process::exit(1);
        }
    }
}
