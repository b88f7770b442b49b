//! Batch descriptive statistics over finite samples.
//!
//! These are the reference computations: the transforms standardize with
//! them, the convergence report summarizes with them, and the running
//! statistics are checked against them.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation.
//! - **Variance**: Welford's single-pass update.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Median**: full sort, average of the two middle order statistics
//!   for even lengths.
//! - **Skewness**: adjusted Fisher–Pearson G₁.
//!   Reference: Joanes & Gill (1998), *The Statistician* 47(1).

use crate::error::{first_non_finite, Result, StatsError};

fn check_finite(data: &[f64]) -> Result<()> {
    match first_non_finite(data) {
        Some(index) => Err(StatsError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Arithmetic mean using compensated summation.
///
/// # Errors
/// - `UndefinedStatistic` if `data` is empty.
/// - `NonFinite` if any value is NaN or infinite.
///
/// # Examples
/// ```
/// use tailstat::stats::mean;
/// assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap() - 3.0).abs() < 1e-15);
/// assert!(mean(&[]).is_err());
/// ```
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::UndefinedStatistic("mean of empty sample"));
    }
    check_finite(data)?;
    Ok(kahan_sum(data) / data.len() as f64)
}

/// Sample variance with Bessel's correction (denominator `n − 1`).
///
/// # Errors
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `NonFinite` if any value is NaN or infinite.
///
/// # Examples
/// ```
/// use tailstat::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(StatsError::UndefinedStatistic(
            "sample variance needs at least 2 values",
        ));
    }
    check_finite(data)?;
    let acc: VarianceAccumulator = data.iter().copied().collect();
    acc.sample_variance()
}

/// Population variance (denominator `n`).
///
/// Used by the Box-Cox profile likelihood, where the maximum-likelihood
/// scale estimate is the biased one.
///
/// # Errors
/// - `UndefinedStatistic` if `data` is empty.
/// - `NonFinite` if any value is NaN or infinite.
pub fn population_variance(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::UndefinedStatistic(
            "population variance of empty sample",
        ));
    }
    check_finite(data)?;
    let acc: VarianceAccumulator = data.iter().copied().collect();
    acc.population_variance()
}

/// Sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Result<f64> {
    variance(data).map(f64::sqrt)
}

/// Median by sorting a copy of the data.
///
/// O(n log n). This is the oracle the incremental
/// [`RunningMedian`](crate::running::RunningMedian) is tested against.
///
/// # Errors
/// - `UndefinedStatistic` if `data` is empty.
/// - `NonFinite` if any value is NaN or infinite.
///
/// # Examples
/// ```
/// use tailstat::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
/// ```
pub fn median(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::UndefinedStatistic("median of empty sample"));
    }
    check_finite(data)?;
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Ok(sorted[n / 2])
    } else {
        Ok((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Adjusted sample skewness G₁ (matches Excel `SKEW()`).
///
/// ```text
/// G₁ = [√(n(n−1)) / (n−2)] × m₃ / m₂^{3/2}
/// ```
///
/// # Errors
/// - `UndefinedStatistic` if fewer than 3 values.
/// - `NonFinite` if any value is NaN or infinite.
/// - `DegenerateSample` if all values are equal.
///
/// # Examples
/// ```
/// use tailstat::stats::skewness;
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-14);
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 50.0]).unwrap() > 0.0);
/// ```
pub fn skewness(data: &[f64]) -> Result<f64> {
    let n = data.len();
    if n < 3 {
        return Err(StatsError::UndefinedStatistic(
            "skewness needs at least 3 values",
        ));
    }
    check_finite(data)?;
    let nf = n as f64;
    let m = kahan_sum(data) / nf;
    let (sum2, sum3) = data.iter().fold((0.0, 0.0), |(s2, s3), &x| {
        let d = x - m;
        (s2 + d * d, s3 + d * d * d)
    });
    let m2 = sum2 / nf;
    if m2 == 0.0 {
        return Err(StatsError::DegenerateSample);
    }
    let g1 = (sum3 / nf) / m2.powf(1.5);
    Ok((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1)
}

/// Neumaier compensated summation.
///
/// Keeps a separate compensation term so that adding a small value to a
/// large running sum (or the reverse) does not lose the low-order bits.
///
/// Reference: Neumaier (1974), *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut acc = CompensatedSum::default();
    for &x in data {
        acc.add(x);
    }
    acc.value()
}

/// Incremental Neumaier sum, shared by [`kahan_sum`] and the running mean.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Welford accumulator for the first two moments.
///
/// # Examples
/// ```
/// use tailstat::stats::VarianceAccumulator;
/// let acc: VarianceAccumulator = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
///     .into_iter()
///     .collect();
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VarianceAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl VarianceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one value.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(StatsError::UndefinedStatistic("mean of empty accumulator"));
        }
        Ok(self.mean)
    }

    /// Variance with denominator `n − 1`.
    pub fn sample_variance(&self) -> Result<f64> {
        if self.count < 2 {
            return Err(StatsError::UndefinedStatistic(
                "sample variance needs at least 2 values",
            ));
        }
        Ok(self.m2 / (self.count - 1) as f64)
    }

    /// Variance with denominator `n`.
    pub fn population_variance(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(StatsError::UndefinedStatistic(
                "population variance of empty accumulator",
            ));
        }
        Ok(self.m2 / self.count as f64)
    }
}

impl FromIterator<f64> for VarianceAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.update(x);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Ok(3.0));
    }

    #[test]
    fn test_mean_empty() {
        assert!(matches!(mean(&[]), Err(StatsError::UndefinedStatistic(_))));
    }

    #[test]
    fn test_mean_non_finite() {
        assert_eq!(
            mean(&[1.0, f64::NAN, 3.0]),
            Err(StatsError::NonFinite { index: 1 })
        );
        assert_eq!(
            mean(&[1.0, 2.0, f64::INFINITY]),
            Err(StatsError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
        assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
        assert!((std_dev(&v).unwrap() - 4.571428571428571_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_variance_too_short() {
        assert!(matches!(
            variance(&[1.0]),
            Err(StatsError::UndefinedStatistic(_))
        ));
        assert!(matches!(
            population_variance(&[]),
            Err(StatsError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_variance_constant_is_zero() {
        assert_eq!(variance(&[5.0; 100]), Ok(0.0));
    }

    #[test]
    fn test_variance_large_offset() {
        // Naive E[X²] − E[X]² cancels catastrophically here.
        let data: Vec<f64> = (1..=5).map(|i| 1e9 + i as f64).collect();
        let var = variance(&data).unwrap();
        assert!((var - 2.5).abs() < 1e-5, "got {var}");
    }

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Ok(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
        assert_eq!(median(&[7.0]), Ok(7.0));
    }

    #[test]
    fn test_median_errors() {
        assert!(matches!(median(&[]), Err(StatsError::UndefinedStatistic(_))));
        assert_eq!(
            median(&[f64::NAN]),
            Err(StatsError::NonFinite { index: 0 })
        );
    }

    #[test]
    fn test_skewness_known_value() {
        // n=5, mean=3.6, m2=5.84, m3=12.672 → G1 ≈ 1.3388
        let s = skewness(&[1.0, 2.0, 3.0, 4.0, 8.0]).unwrap();
        assert!((s - 1.339).abs() < 0.01, "got {s}");
    }

    #[test]
    fn test_skewness_edge_cases() {
        assert!(matches!(
            skewness(&[1.0, 2.0]),
            Err(StatsError::UndefinedStatistic(_))
        ));
        assert_eq!(skewness(&[5.0, 5.0, 5.0]), Err(StatsError::DegenerateSample));
        assert!(skewness(&[-50.0, 1.0, 2.0, 3.0, 4.0]).unwrap() < 0.0);
    }

    #[test]
    fn test_kahan_sum_precision() {
        let result = kahan_sum(&[1e16, 1.0, -1e16]);
        assert!((result - 1.0).abs() < 1e-10, "got {result}");
    }

    #[test]
    fn test_accumulator_empty() {
        let acc = VarianceAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert!(acc.mean().is_err());
        assert!(acc.sample_variance().is_err());
        assert!(acc.population_variance().is_err());
    }

    #[test]
    fn test_accumulator_single() {
        let acc: VarianceAccumulator = [5.0].into_iter().collect();
        assert_eq!(acc.mean(), Ok(5.0));
        assert!(acc.sample_variance().is_err());
        assert_eq!(acc.population_variance(), Ok(0.0));
    }
}
