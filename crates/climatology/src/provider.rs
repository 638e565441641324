//! The climatology provider seam.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Named latitude/longitude arguments for the keyword call shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateArgs {
    pub latitude: f64,
    pub longitude: f64,
}

/// The two argument shapes a provider may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// `(times, latitude=, longitude=)`
    Keyword,
    /// `(times, latitude, longitude)`
    Positional,
}

impl std::fmt::Display for CallShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallShape::Keyword => write!(f, "keyword"),
            CallShape::Positional => write!(f, "positional"),
        }
    }
}

/// Errors reported by a climatology provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not accept this argument shape.
    #[error("provider does not accept {0} arguments")]
    SignatureMismatch(CallShape),

    /// The coordinate falls outside the provider's table.
    #[error("{coordinate} {value} is out of range ({min}, {max})")]
    OutOfRange {
        coordinate: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Any other lookup failure.
    #[error("{0}")]
    Lookup(String),
}

impl ProviderError {
    /// True if this error only means the call shape is unsupported.
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, ProviderError::SignatureMismatch(_))
    }
}

/// A source of monthly turbidity values for a coordinate.
///
/// Implementations return one value per timestamp, in timestamp order.
/// Both methods default to reporting [`ProviderError::SignatureMismatch`],
/// so a provider only implements the call shapes it actually supports.
/// Providers must be deterministic for fixed inputs and safe to call from
/// several threads at once.
pub trait ClimatologyProvider: Send + Sync {
    /// Look up values with named latitude/longitude arguments.
    fn lookup_keyword(
        &self,
        _times: &[DateTime<Utc>],
        _args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        Err(ProviderError::SignatureMismatch(CallShape::Keyword))
    }

    /// Look up values with positional latitude/longitude arguments.
    fn lookup_positional(
        &self,
        _times: &[DateTime<Utc>],
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        Err(ProviderError::SignatureMismatch(CallShape::Positional))
    }
}

impl<P: ClimatologyProvider + ?Sized> ClimatologyProvider for &P {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        (**self).lookup_keyword(times, args)
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        (**self).lookup_positional(times, latitude, longitude)
    }
}

impl<P: ClimatologyProvider + ?Sized> ClimatologyProvider for std::sync::Arc<P> {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        (**self).lookup_keyword(times, args)
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        (**self).lookup_positional(times, latitude, longitude)
    }
}
