//! Per-cell monthly sampling with call-shape probing.

use chrono::{DateTime, Utc};
use tl_common::{TlError, TlResult};
use tracing::trace;

use crate::provider::{CallShape, ClimatologyProvider, CoordinateArgs, ProviderError};

/// Obtains the monthly turbidity series for a grid cell.
///
/// The provider's accepted argument shape cannot be inspected, so each
/// lookup first tries the keyword shape and, only when the provider
/// answers [`ProviderError::SignatureMismatch`], retries positionally.
/// Any other provider error is returned as
/// [`TlError::CollaboratorFailure`] without a retry.
pub struct ClimatologySampler<P> {
    provider: P,
}

impl<P: ClimatologyProvider> ClimatologySampler<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One value per entry of `months`, in the same order.
    pub fn sample(
        &self,
        months: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> TlResult<Vec<f64>> {
        let values = self
            .dispatch(months, latitude, longitude)
            .map_err(|e| TlError::collaborator_failure(latitude, longitude, e.to_string()))?;

        if values.len() != months.len() {
            return Err(TlError::collaborator_failure(
                latitude,
                longitude,
                format!(
                    "provider returned {} values for {} months",
                    values.len(),
                    months.len()
                ),
            ));
        }

        Ok(values)
    }

    fn dispatch(
        &self,
        months: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        let args = CoordinateArgs {
            latitude,
            longitude,
        };
        match self.provider.lookup_keyword(months, args) {
            Err(ProviderError::SignatureMismatch(_)) => {
                trace!(latitude, longitude, "Keyword lookup unsupported, retrying positionally");
            }
            result => return result,
        }

        match self.provider.lookup_positional(months, latitude, longitude) {
            Err(ProviderError::SignatureMismatch(_)) => Err(ProviderError::Lookup(format!(
                "provider accepts neither {} nor {} arguments",
                CallShape::Keyword,
                CallShape::Positional
            ))),
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tl_common::climatology_months;

    fn series(latitude: f64, longitude: f64, times: &[DateTime<Utc>]) -> Vec<f64> {
        (0..times.len())
            .map(|k| latitude.abs() / 10.0 + longitude.abs() / 100.0 + k as f64)
            .collect()
    }

    /// Supports only the keyword shape.
    struct KeywordOnly;

    impl ClimatologyProvider for KeywordOnly {
        fn lookup_keyword(
            &self,
            times: &[DateTime<Utc>],
            args: CoordinateArgs,
        ) -> Result<Vec<f64>, ProviderError> {
            Ok(series(args.latitude, args.longitude, times))
        }
    }

    /// Older interface: rejects keyword calls.
    struct PositionalOnly;

    impl ClimatologyProvider for PositionalOnly {
        fn lookup_positional(
            &self,
            times: &[DateTime<Utc>],
            latitude: f64,
            longitude: f64,
        ) -> Result<Vec<f64>, ProviderError> {
            Ok(series(latitude, longitude, times))
        }
    }

    /// Fails every keyword call with a data error and counts positional calls.
    #[derive(Default)]
    struct Failing {
        positional_calls: AtomicUsize,
    }

    impl ClimatologyProvider for Failing {
        fn lookup_keyword(
            &self,
            _times: &[DateTime<Utc>],
            _args: CoordinateArgs,
        ) -> Result<Vec<f64>, ProviderError> {
            Err(ProviderError::Lookup("no data for coordinate".into()))
        }

        fn lookup_positional(
            &self,
            times: &[DateTime<Utc>],
            latitude: f64,
            longitude: f64,
        ) -> Result<Vec<f64>, ProviderError> {
            self.positional_calls.fetch_add(1, Ordering::SeqCst);
            Ok(series(latitude, longitude, times))
        }
    }

    struct Neither;
    impl ClimatologyProvider for Neither {}

    struct ShortSeries;

    impl ClimatologyProvider for ShortSeries {
        fn lookup_keyword(
            &self,
            _times: &[DateTime<Utc>],
            _args: CoordinateArgs,
        ) -> Result<Vec<f64>, ProviderError> {
            Ok(vec![1.0; 3])
        }
    }

    #[test]
    fn test_keyword_shape() {
        let months = climatology_months(2000).unwrap();
        let sampler = ClimatologySampler::new(KeywordOnly);
        let values = sampler.sample(&months, 10.0, 20.0).unwrap();
        assert_eq!(values, series(10.0, 20.0, &months));
    }

    #[test]
    fn test_positional_fallback() {
        let months = climatology_months(2000).unwrap();
        let sampler = ClimatologySampler::new(PositionalOnly);
        let values = sampler.sample(&months, -30.5, 100.5).unwrap();
        assert_eq!(values.len(), 12);
        assert_eq!(values, series(-30.5, 100.5, &months));
    }

    #[test]
    fn test_other_failure_not_retried() {
        let months = climatology_months(2000).unwrap();
        let sampler = ClimatologySampler::new(Failing::default());
        let err = sampler.sample(&months, 1.5, 2.5).unwrap_err();

        match err {
            TlError::CollaboratorFailure {
                latitude,
                longitude,
                message,
            } => {
                assert_eq!(latitude, 1.5);
                assert_eq!(longitude, 2.5);
                assert!(message.contains("no data"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(sampler.provider().positional_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_supported_shape() {
        let months = climatology_months(2000).unwrap();
        let err = ClimatologySampler::new(Neither)
            .sample(&months, 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, TlError::CollaboratorFailure { .. }));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let months = climatology_months(2000).unwrap();
        let err = ClimatologySampler::new(ShortSeries)
            .sample(&months, 0.0, 0.0)
            .unwrap_err();
        assert!(err.to_string().contains("3 values for 12 months"));
    }

    #[test]
    fn test_sampler_over_reference() {
        let months = climatology_months(2000).unwrap();
        let provider = PositionalOnly;
        let sampler = ClimatologySampler::new(&provider);
        assert_eq!(sampler.sample(&months, 5.0, 5.0).unwrap().len(), 12);
    }
}
