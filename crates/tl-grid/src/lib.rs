//! Quantized Linke turbidity climatology grid.
//!
//! Builds a `(month, lat, lon)` byte volume from a climatology provider and
//! serializes it to the compact little-endian TLB2 format consumed by
//! clear-sky irradiance models.
//!
//! # Pipeline
//!
//! ```text
//! BuildConfig
//!      │
//!      ▼
//! GridAssembler::assemble(lat_axis, lon_axis, scale)
//!      │
//!      ├─► centers() for each axis
//!      │
//!      ├─► ClimatologySampler::sample() per (lat, lon) cell, in parallel
//!      │
//!      ├─► quantize() each monthly value to u8
//!      │
//!      └─► scatter into volume[m * nlat * nlon + i * nlon + j]
//!               │
//!               ▼
//!          QuantizedGrid ──► format::encode ──► write_atomic(path)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use climatology::LinkeTableProvider;
//! use tl_grid::{BuildConfig, GridAssembler, write_atomic};
//!
//! let config = BuildConfig::default();
//! let provider = LinkeTableProvider::open(&config.table_path, config.interpolate)?;
//! let grid = GridAssembler::new(provider).assemble_config(&config)?;
//! write_atomic(&config.output, &grid)?;
//! ```

pub mod assemble;
pub mod config;
pub mod format;
pub mod quantize;
pub mod types;
pub mod writer;

pub use assemble::GridAssembler;
pub use config::BuildConfig;
pub use format::{decode, encode, from_bytes, to_bytes, HEADER_LEN, MAGIC, VERSION};
pub use quantize::{quantize, quantize_series, DEFAULT_SCALE};
pub use types::{GridMetadata, QuantizedGrid};
pub use writer::write_atomic;
