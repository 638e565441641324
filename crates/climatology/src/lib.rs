//! Climatology lookup for monthly Linke turbidity.
//!
//! The grid builder treats the climatology source as an external
//! collaborator. This crate defines the seam ([`ClimatologyProvider`]),
//! a concrete provider backed by the worldwide Linke turbidity table
//! ([`LinkeTableProvider`]), and the [`ClimatologySampler`] that hides the
//! provider's call-shape differences from callers.
//!
//! # Call shapes
//!
//! ```text
//! ClimatologySampler::sample(months, lat, lon)
//!      │
//!      ├─► provider.lookup_keyword(months, CoordinateArgs { .. })
//!      │         │
//!      │         ├─► Ok(values)              -> return values
//!      │         ├─► Err(SignatureMismatch)  -> fall through
//!      │         └─► Err(other)              -> propagate
//!      │
//!      └─► provider.lookup_positional(months, lat, lon)
//! ```

pub mod linke;
pub mod provider;
pub mod sampler;

pub use linke::{LinkeTable, LinkeTableProvider, LINKE_COLS, LINKE_ROWS, LINKE_SCALE};
pub use provider::{CallShape, ClimatologyProvider, CoordinateArgs, ProviderError};
pub use sampler::ClimatologySampler;
