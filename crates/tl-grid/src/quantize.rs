//! Linear uint8 quantization of turbidity values.

use tl_common::{TlError, TlResult, MONTHS_PER_YEAR};

/// Quantization factor used for published grids.
pub const DEFAULT_SCALE: u32 = 20;

/// Quantize a turbidity value as `round(clip(value * scale, 0, 255))`.
///
/// The clip is applied to the scaled value and the result is then rounded
/// half to even, so `12.78 * 20 = 255.6` clips to 255 and `3.07 * 20 = 61.4`
/// rounds to 61. Returns `None` for NaN or infinite input.
pub fn quantize(value: f64, scale: u32) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value * scale as f64).clamp(0.0, 255.0);
    Some(scaled.round_ties_even() as u8)
}

/// Quantize the 12 monthly values of one cell.
pub fn quantize_series(
    values: &[f64],
    scale: u32,
    latitude: f64,
    longitude: f64,
) -> TlResult<[u8; MONTHS_PER_YEAR]> {
    if values.len() != MONTHS_PER_YEAR {
        return Err(TlError::collaborator_failure(
            latitude,
            longitude,
            format!("expected {} monthly values, got {}", MONTHS_PER_YEAR, values.len()),
        ));
    }

    let mut out = [0u8; MONTHS_PER_YEAR];
    for (month, (&value, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        *slot = quantize(value, scale).ok_or(TlError::InvalidValue {
            latitude,
            longitude,
            month,
            value,
        })?;
    }
    Ok(out)
}
