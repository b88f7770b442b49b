//! Cumulative (running) mean and median over an observation stream.
//!
//! Both statistics are queryable after every observation, which is what
//! makes convergence (or the lack of it) visible as the sample grows.
//!
//! # Complexity
//!
//! | Statistic | Update | Query | Memory |
//! |---|---|---|---|
//! | [`RunningMean`] | O(1) | O(1) | O(1) |
//! | [`RunningMedian`] | O(log n) | O(1) | O(n) |
//!
//! The median uses the classic two-heap layout: a max-heap holding the
//! lower half of the observations and a min-heap holding the upper half,
//! rebalanced so the lower half is never smaller than the upper half and
//! never more than one element larger.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::{first_non_finite, Result, StatsError};
use crate::stats::CompensatedSum;

/// Statistics of the first `index` observations.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RunningStatisticSample {
    /// Prefix length, starting at 1.
    pub index: usize,
    pub cumulative_mean: f64,
    pub cumulative_median: f64,
}

/// Running mean over a compensated sum.
///
/// # Examples
/// ```
/// use tailstat::running::RunningMean;
/// let mut m = RunningMean::new();
/// assert!(m.mean().is_err());
/// m.push(1.0).unwrap();
/// m.push(2.0).unwrap();
/// assert!(m.push(f64::NAN).is_err());
/// assert_eq!(m.mean().unwrap(), 1.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunningMean {
    sum: CompensatedSum,
    count: u64,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `NonFinite` if `x` is NaN or infinite; the state is left untouched.
    pub fn push(&mut self, x: f64) -> Result<()> {
        if !x.is_finite() {
            return Err(StatsError::NonFinite {
                index: self.count as usize,
            });
        }
        self.sum.add(x);
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of everything pushed so far.
    ///
    /// # Errors
    /// `UndefinedStatistic` before the first observation.
    pub fn mean(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(StatsError::UndefinedStatistic("mean of empty series"));
        }
        Ok(self.sum.value() / self.count as f64)
    }
}

/// `f64` with a total order, for heap storage.
#[derive(Debug, Clone, Copy)]
struct Ordered(f64);

impl PartialEq for Ordered {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ordered {}

impl PartialOrd for Ordered {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ordered {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Incremental median over two heaps.
///
/// Odd counts report the single middle order statistic, even counts the
/// average of the two middle ones.
///
/// # Examples
/// ```
/// use tailstat::running::RunningMedian;
/// let mut m = RunningMedian::new();
/// for x in [5.0, 1.0, 3.0, 2.0] {
///     m.push(x).unwrap();
/// }
/// assert_eq!(m.median().unwrap(), 2.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunningMedian {
    lower: BinaryHeap<Ordered>,
    upper: BinaryHeap<Reverse<Ordered>>,
}

impl RunningMedian {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `NonFinite` if `x` is NaN or infinite; the state is left untouched.
    pub fn push(&mut self, x: f64) -> Result<()> {
        if !x.is_finite() {
            return Err(StatsError::NonFinite { index: self.count() });
        }
        match self.lower.peek() {
            Some(&Ordered(top)) if x > top => self.upper.push(Reverse(Ordered(x))),
            _ => self.lower.push(Ordered(x)),
        }

        // Invariant: lower.len() == upper.len() or lower.len() == upper.len() + 1
        if self.lower.len() > self.upper.len() + 1 {
            if let Some(v) = self.lower.pop() {
                self.upper.push(Reverse(v));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(v)) = self.upper.pop() {
                self.lower.push(v);
            }
        }
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// Median of everything pushed so far.
    ///
    /// # Errors
    /// `UndefinedStatistic` before the first observation.
    pub fn median(&self) -> Result<f64> {
        match (self.lower.peek(), self.upper.peek()) {
            (Some(&Ordered(lo)), Some(&Reverse(Ordered(hi))))
                if self.lower.len() == self.upper.len() =>
            {
                Ok((lo + hi) / 2.0)
            }
            (Some(&Ordered(lo)), _) => Ok(lo),
            _ => Err(StatsError::UndefinedStatistic("median of empty series")),
        }
    }
}

/// Running mean and median together.
#[derive(Debug, Clone, Default)]
pub struct RunningStatistics {
    mean: RunningMean,
    median: RunningMedian,
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one observation and returns the statistics of the new prefix.
    ///
    /// # Errors
    /// `NonFinite` if `x` is NaN or infinite; the state is left untouched.
    pub fn push(&mut self, x: f64) -> Result<RunningStatisticSample> {
        // both halves reject the same inputs, so a failure leaves neither changed
        self.mean.push(x)?;
        self.median.push(x)?;
        Ok(RunningStatisticSample {
            index: self.median.count(),
            cumulative_mean: self.mean.mean()?,
            cumulative_median: self.median.median()?,
        })
    }

    pub fn count(&self) -> usize {
        self.median.count()
    }

    pub fn mean(&self) -> Result<f64> {
        self.mean.mean()
    }

    pub fn median(&self) -> Result<f64> {
        self.median.median()
    }
}

fn check_series(series: &[f64]) -> Result<()> {
    if series.is_empty() {
        return Err(StatsError::UndefinedStatistic(
            "running statistic of empty series",
        ));
    }
    match first_non_finite(series) {
        Some(index) => Err(StatsError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Mean of every prefix of `series`; output length equals input length.
///
/// # Errors
/// - `UndefinedStatistic` if `series` is empty.
/// - `NonFinite` if any observation is NaN or infinite.
///
/// # Examples
/// ```
/// use tailstat::running::running_mean;
/// assert_eq!(running_mean(&[2.0, 4.0, 9.0]).unwrap(), vec![2.0, 3.0, 5.0]);
/// ```
pub fn running_mean(series: &[f64]) -> Result<Vec<f64>> {
    check_series(series)?;
    let mut acc = RunningMean::new();
    series
        .iter()
        .map(|&x| {
            acc.push(x)?;
            acc.mean()
        })
        .collect()
}

/// Median of every prefix of `series`; output length equals input length.
///
/// # Errors
/// - `UndefinedStatistic` if `series` is empty.
/// - `NonFinite` if any observation is NaN or infinite.
///
/// # Examples
/// ```
/// use tailstat::running::running_median;
/// assert_eq!(
///     running_median(&[3.0, 1.0, 2.0, 10.0]).unwrap(),
///     vec![3.0, 2.0, 2.0, 2.5]
/// );
/// ```
pub fn running_median(series: &[f64]) -> Result<Vec<f64>> {
    check_series(series)?;
    let mut acc = RunningMedian::new();
    series
        .iter()
        .map(|&x| {
            acc.push(x)?;
            acc.median()
        })
        .collect()
}

/// One [`RunningStatisticSample`] per observation.
///
/// # Errors
/// Same as [`running_mean`].
pub fn running_statistics(series: &[f64]) -> Result<Vec<RunningStatisticSample>> {
    check_series(series)?;
    let mut acc = RunningStatistics::new();
    series.iter().map(|&x| acc.push(x)).collect()
}
