//! Stub climatology providers.
//!
//! Each stub exercises one behavior of the provider seam: a call shape,
//! a failure mode, or call accounting.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use climatology::{ClimatologyProvider, CoordinateArgs, ProviderError};

/// Deterministic synthetic turbidity for a cell and zero-based month.
///
/// Ranges from about 2 to 8, varying with latitude, longitude and month so
/// misplaced bytes are easy to spot.
pub fn synthetic_turbidity(latitude: f64, longitude: f64, month: usize) -> f64 {
    2.0 + latitude.abs() / 30.0 + (longitude + 180.0) / 360.0 + month as f64 * 0.25
}

fn synthetic_series(times: &[DateTime<Utc>], latitude: f64, longitude: f64) -> Vec<f64> {
    (0..times.len())
        .map(|m| synthetic_turbidity(latitude, longitude, m))
        .collect()
}

/// Current interface: accepts keyword arguments only.
#[derive(Debug, Default)]
pub struct KeywordProvider;

impl ClimatologyProvider for KeywordProvider {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        Ok(synthetic_series(times, args.latitude, args.longitude))
    }
}

/// Older interface: signature mismatch on keyword calls, counts both shapes.
#[derive(Debug, Default)]
pub struct PositionalProvider {
    pub keyword_calls: AtomicUsize,
    pub positional_calls: AtomicUsize,
}

impl ClimatologyProvider for PositionalProvider {
    fn lookup_keyword(
        &self,
        _times: &[DateTime<Utc>],
        _args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        self.keyword_calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::SignatureMismatch(climatology::CallShape::Keyword))
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        self.positional_calls.fetch_add(1, Ordering::SeqCst);
        Ok(synthetic_series(times, latitude, longitude))
    }
}

/// Fails with a data error at one coordinate and counts positional retries.
#[derive(Debug)]
pub struct FailingProvider {
    pub fail_latitude: f64,
    pub fail_longitude: f64,
    pub positional_calls: AtomicUsize,
}

impl FailingProvider {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            fail_latitude: latitude,
            fail_longitude: longitude,
            positional_calls: AtomicUsize::new(0),
        }
    }
}

impl ClimatologyProvider for FailingProvider {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        if args.latitude == self.fail_latitude && args.longitude == self.fail_longitude {
            return Err(ProviderError::Lookup("data unavailable".to_string()));
        }
        Ok(synthetic_series(times, args.latitude, args.longitude))
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        self.positional_calls.fetch_add(1, Ordering::SeqCst);
        Ok(synthetic_series(times, latitude, longitude))
    }
}

/// Returns the same value for every month and cell.
#[derive(Debug)]
pub struct ConstantProvider(pub f64);

impl ClimatologyProvider for ConstantProvider {
    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        Ok(vec![self.0; times.len()])
    }
}

/// Wraps a provider and counts lookups that reach it.
#[derive(Debug, Default)]
pub struct CountingProvider<P> {
    pub inner: P,
    pub calls: AtomicUsize,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: ClimatologyProvider> ClimatologyProvider for CountingProvider<P> {
    fn lookup_keyword(
        &self,
        times: &[DateTime<Utc>],
        args: CoordinateArgs,
    ) -> Result<Vec<f64>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_keyword(times, args)
    }

    fn lookup_positional(
        &self,
        times: &[DateTime<Utc>],
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<f64>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_positional(times, latitude, longitude)
    }
}
