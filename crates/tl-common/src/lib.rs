//! Common types shared across the turbidity grid builder crates.

pub mod error;
pub mod grid;
pub mod time;

pub use error::{TlError, TlResult};
pub use grid::{centers, AxisSpec, GridSpec};
pub use time::{climatology_months, MONTHS_PER_YEAR};
