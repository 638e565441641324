//! Error types for the turbidity grid pipeline.

use thiserror::Error;

/// Result type alias using TlError.
pub type TlResult<T> = Result<T, TlError>;

/// Fatal errors raised while building or reading a turbidity grid.
///
/// Every variant aborts the run. Signature mismatches from the climatology
/// provider never appear here; the sampler recovers from them.
#[derive(Debug, Error)]
pub enum TlError {
    // === Geometry Errors ===
    #[error("Invalid {axis} domain [{min}, {max}) with step {step}: {reason}")]
    InvalidDomain {
        axis: String,
        min: f64,
        max: f64,
        step: f64,
        reason: String,
    },

    // === Sampling Errors ===
    #[error("Climatology lookup failed at lat={latitude}, lon={longitude}: {message}")]
    CollaboratorFailure {
        latitude: f64,
        longitude: f64,
        message: String,
    },

    #[error("Non-finite turbidity {value} for month {month} at lat={latitude}, lon={longitude}")]
    InvalidValue {
        latitude: f64,
        longitude: f64,
        month: usize,
        value: f64,
    },

    // === Encoding Errors ===
    #[error("Field '{field}' value {value} exceeds encodable maximum {limit}")]
    EncodingOverflow {
        field: &'static str,
        value: u64,
        limit: u64,
    },

    #[error("Invalid TLB2 data: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TlError {
    /// Create an InvalidDomain error for the named axis.
    pub fn invalid_domain(
        axis: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDomain {
            axis: axis.into(),
            min,
            max,
            step,
            reason: reason.into(),
        }
    }

    /// Create a CollaboratorFailure error for a grid cell.
    pub fn collaborator_failure(latitude: f64, longitude: f64, message: impl Into<String>) -> Self {
        Self::CollaboratorFailure {
            latitude,
            longitude,
            message: message.into(),
        }
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            TlError::InvalidDomain { .. } | TlError::Config(_) => "configuration",
            TlError::CollaboratorFailure { .. } => "sampling",
            TlError::InvalidValue { .. } => "quantization",
            TlError::EncodingOverflow { .. } => "encoding",
            TlError::InvalidFormat(_) => "decoding",
            TlError::Io(_) => "output",
        }
    }
}
