//! Immutable, ordered observation series.

use crate::error::{first_non_finite, Result, StatsError};

/// An ordered sequence of finite observations in arrival order.
///
/// Once built the series is never mutated; every derived quantity
/// (running statistics, transforms) is computed from a borrowed slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    values: Vec<f64>,
}

impl ObservationSeries {
    /// Wraps `values`, rejecting NaN and infinities.
    ///
    /// # Errors
    /// `NonFinite` with the position of the first offending value.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some(index) = first_non_finite(&values) {
            return Err(StatsError::NonFinite { index });
        }
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// The first `n` observations (clamped to the series length).
    pub fn prefix(&self, n: usize) -> &[f64] {
        &self.values[..n.min(self.values.len())]
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for ObservationSeries {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
