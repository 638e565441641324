//! Turbidity grid builder service.
//!
//! Loads a [`BuildConfig`](tl_grid::BuildConfig), assembles the quantized
//! grid from the Linke turbidity table and writes it atomically.

pub mod config_loader;
pub mod pipeline;

pub use config_loader::{load_config_file, BuilderFileConfig, LoggingConfig};
pub use pipeline::{failure_stage, run, run_with_provider, BuildSummary};
