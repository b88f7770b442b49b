//! Variance-stabilizing transforms for strictly positive samples.
//!
//! Each transform maps the sample through a skew-reducing function and
//! then standardizes the result to sample mean 0 and sample standard
//! deviation 1 (denominator `n − 1`).
//!
//! # Box-Cox
//!
//! ```text
//! y(λ) = (x^λ − 1) / λ   for λ ≠ 0
//!      = ln x            for λ = 0
//! ```
//!
//! λ is chosen by maximizing the profile log-likelihood
//!
//! ```text
//! ℓ(λ) = −(n/2)·ln σ̂²(λ) + (λ − 1)·Σ ln xᵢ
//! ```
//!
//! where σ̂²(λ) is the population variance of the transformed values. The
//! search covers [`LAMBDA_RANGE`] with a coarse grid followed by a
//! golden-section refinement around the best grid point.
//!
//! Reference: Box & Cox (1964), "An Analysis of Transformations",
//! *JRSS B* 26(2), pp. 211–252.

use log::debug;
use serde::Serialize;

use crate::error::{Result, StatsError};
use crate::stats::{self, VarianceAccumulator};

/// Bounds of the Box-Cox λ search.
pub const LAMBDA_RANGE: (f64, f64) = (-5.0, 5.0);

/// |λ| below this applies `ln x` instead of the power formula.
pub const LOG_TOLERANCE: f64 = 1e-4;

const GRID_STEPS: usize = 100;
const GOLDEN_TOLERANCE: f64 = 1e-8;

/// Which transform produced a [`TransformResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMethod {
    Log,
    BoxCox,
}

/// A standardized, transformed sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformResult {
    pub method: TransformMethod,
    /// Estimated Box-Cox λ; `None` for the log transform.
    pub parameter: Option<f64>,
    /// Transformed values with mean 0 and standard deviation 1, in input order.
    pub standardized_values: Vec<f64>,
}

/// Checks that every value is finite and strictly positive.
fn validate_positive(sample: &[f64]) -> Result<()> {
    if sample.is_empty() {
        return Err(StatsError::UndefinedStatistic("transform of empty sample"));
    }
    for (index, &value) in sample.iter().enumerate() {
        if !value.is_finite() {
            return Err(StatsError::NonFinite { index });
        }
        if value <= 0.0 {
            return Err(StatsError::InvalidDomain { index, value });
        }
    }
    Ok(())
}

fn check_lambda(lambda: f64) -> Result<()> {
    if lambda.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidParameters(format!(
            "Box-Cox λ must be finite, got {lambda}"
        )))
    }
}

/// Box-Cox of a single value given its logarithm.
#[inline]
fn box_cox_from_ln(ln_x: f64, lambda: f64) -> f64 {
    if lambda.abs() < LOG_TOLERANCE {
        ln_x
    } else {
        // expm1 keeps precision when λ·ln x is small
        (lambda * ln_x).exp_m1() / lambda
    }
}

/// Rescales `values` to sample mean 0 and sample standard deviation 1.
///
/// # Errors
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `NonFinite` if any value is NaN or infinite.
/// - `DegenerateSample` if all values are equal.
///
/// # Examples
/// ```
/// use tailstat::transform::standardize;
/// let z = standardize(&[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(z, vec![-1.0, 0.0, 1.0]);
/// ```
pub fn standardize(values: &[f64]) -> Result<Vec<f64>> {
    let m = stats::mean(values)?;
    let sd = stats::std_dev(values)?;
    if sd == 0.0 {
        return Err(StatsError::DegenerateSample);
    }
    Ok(values.iter().map(|&v| (v - m) / sd).collect())
}

/// Natural-log transform followed by standardization.
///
/// # Errors
/// - `InvalidDomain` if any value is `≤ 0`; no partial result is returned.
/// - `NonFinite` if any value is NaN or infinite.
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `DegenerateSample` if all values are equal.
///
/// # Examples
/// ```
/// use tailstat::transform::{log_transform, TransformMethod};
/// let r = log_transform(&[1.0, 10.0, 100.0]).unwrap();
/// assert_eq!(r.method, TransformMethod::Log);
/// assert!((r.standardized_values[1]).abs() < 1e-12);
/// ```
pub fn log_transform(sample: &[f64]) -> Result<TransformResult> {
    validate_positive(sample)?;
    let logs: Vec<f64> = sample.iter().map(|x| x.ln()).collect();
    Ok(TransformResult {
        method: TransformMethod::Log,
        parameter: None,
        standardized_values: standardize(&logs)?,
    })
}

/// Applies the Box-Cox transform with a fixed `lambda` (no standardization).
///
/// # Errors
/// - `InvalidParameters` if `lambda` is not finite.
/// - `InvalidDomain` / `NonFinite` for bad input values.
/// - `NonFinite` if a transformed value overflows.
///
/// # Examples
/// ```
/// use tailstat::transform::box_cox;
/// let y = box_cox(&[1.0, 4.0], 0.5).unwrap();
/// assert_eq!(y[0], 0.0);
/// assert!((y[1] - 2.0).abs() < 1e-12);
/// ```
pub fn box_cox(sample: &[f64], lambda: f64) -> Result<Vec<f64>> {
    check_lambda(lambda)?;
    validate_positive(sample)?;
    sample
        .iter()
        .enumerate()
        .map(|(index, x)| {
            let y = box_cox_from_ln(x.ln(), lambda);
            if y.is_finite() {
                Ok(y)
            } else {
                Err(StatsError::NonFinite { index })
            }
        })
        .collect()
}

/// Profile log-likelihood ℓ(λ) evaluated from precomputed logarithms.
///
/// Returns `None` when the transformed values overflow or have zero spread.
fn profile_log_likelihood(logs: &[f64], log_sum: f64, lambda: f64) -> Option<f64> {
    let acc: VarianceAccumulator = logs.iter().map(|&l| box_cox_from_ln(l, lambda)).collect();
    let var = acc.population_variance().ok()?;
    if !var.is_finite() || var <= 0.0 {
        return None;
    }
    let n = logs.len() as f64;
    Some(-0.5 * n * var.ln() + (lambda - 1.0) * log_sum)
}

/// Box-Cox profile log-likelihood of `sample` at `lambda`.
///
/// # Errors
/// - `InvalidParameters` if `lambda` is not finite.
/// - `InvalidDomain` / `NonFinite` for bad input values.
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `DegenerateSample` if the transformed values have zero variance or
///   overflow.
pub fn box_cox_log_likelihood(sample: &[f64], lambda: f64) -> Result<f64> {
    check_lambda(lambda)?;
    validate_positive(sample)?;
    if sample.len() < 2 {
        return Err(StatsError::UndefinedStatistic(
            "Box-Cox likelihood needs at least 2 values",
        ));
    }
    let logs: Vec<f64> = sample.iter().map(|x| x.ln()).collect();
    let log_sum = stats::kahan_sum(&logs);
    profile_log_likelihood(&logs, log_sum, lambda).ok_or(StatsError::DegenerateSample)
}

/// Maximum-likelihood Box-Cox λ within [`LAMBDA_RANGE`].
///
/// # Errors
/// - `InvalidDomain` / `NonFinite` for bad input values.
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `DegenerateSample` if all values are equal.
pub fn estimate_box_cox_lambda(sample: &[f64]) -> Result<f64> {
    validate_positive(sample)?;
    if sample.len() < 2 {
        return Err(StatsError::UndefinedStatistic(
            "Box-Cox estimation needs at least 2 values",
        ));
    }
    let logs: Vec<f64> = sample.iter().map(|x| x.ln()).collect();
    if logs.iter().all(|&l| l == logs[0]) {
        return Err(StatsError::DegenerateSample);
    }
    let log_sum = stats::kahan_sum(&logs);
    let objective = |lambda: f64| {
        profile_log_likelihood(&logs, log_sum, lambda).unwrap_or(f64::NEG_INFINITY)
    };

    let (lo, hi) = LAMBDA_RANGE;
    let step = (hi - lo) / GRID_STEPS as f64;
    let mut best = (lo, f64::NEG_INFINITY);
    for i in 0..=GRID_STEPS {
        let lambda = lo + (hi - lo) * i as f64 / GRID_STEPS as f64;
        let ll = objective(lambda);
        if ll > best.1 {
            best = (lambda, ll);
        }
    }
    if best.1 == f64::NEG_INFINITY {
        return Err(StatsError::DegenerateSample);
    }

    let refined = golden_section_max(
        &objective,
        (best.0 - step).max(lo),
        (best.0 + step).min(hi),
        GOLDEN_TOLERANCE,
    );
    let refined_ll = objective(refined);
    let lambda = if refined_ll >= best.1 { refined } else { best.0 };

    debug!(
        "box-cox λ={:.6} (grid λ={:.2}, ℓ={:.4}) over {} values",
        lambda,
        best.0,
        refined_ll.max(best.1),
        sample.len()
    );
    Ok(lambda)
}

/// Golden-section search for the maximum of a unimodal `f` on `[a, b]`.
///
/// Reference: Kiefer (1953), "Sequential Minimax Search for a Maximum",
/// *Proc. AMS* 4(3).
fn golden_section_max<F: Fn(f64) -> f64>(f: &F, mut a: f64, mut b: f64, tol: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    while b - a > tol {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    (a + b) / 2.0
}

/// Box-Cox transform with maximum-likelihood λ, then standardization.
///
/// When the estimated |λ| is below [`LOG_TOLERANCE`] the values are
/// log-transformed, so the result coincides with [`log_transform`].
///
/// # Errors
/// - `InvalidDomain` if any value is `≤ 0`; no partial result is returned.
/// - `NonFinite` if any value is NaN or infinite, or overflows.
/// - `UndefinedStatistic` if fewer than 2 values.
/// - `DegenerateSample` if all values are equal.
pub fn box_cox_transform(sample: &[f64]) -> Result<TransformResult> {
    let lambda = estimate_box_cox_lambda(sample)?;
    let transformed = box_cox(sample, lambda)?;
    Ok(TransformResult {
        method: TransformMethod::BoxCox,
        parameter: Some(lambda),
        standardized_values: standardize(&transformed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{LogNormal, Normal, SeriesDistribution};
    use crate::random::{create_rng, generate_series};

    fn assert_standardized(values: &[f64]) {
        let m = stats::mean(values).unwrap();
        let sd = stats::std_dev(values).unwrap();
        assert!(m.abs() < 1e-9, "mean {m}");
        assert!((sd - 1.0).abs() < 1e-9, "sd {sd}");
    }

    /// Lognormal sample built from mirrored Gaussian pairs, so Σ ln x = 0
    /// and the Box-Cox likelihood is symmetric about λ = 0.
    fn mirrored_lognormal(pairs: usize, sigma: f64, seed: u64) -> Vec<f64> {
        let normal = Normal::new(0.0, sigma).unwrap();
        let mut rng = create_rng(seed);
        let mut out = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let g = normal.sample(&mut rng);
            out.push(g.exp());
            out.push((-g).exp());
        }
        out
    }

    #[test]
    fn test_standardize_degenerate() {
        assert_eq!(standardize(&[3.0, 3.0, 3.0]), Err(StatsError::DegenerateSample));
        assert!(matches!(
            standardize(&[3.0]),
            Err(StatsError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_log_transform_standardized() {
        let sample =
            generate_series(5_000, 17, SeriesDistribution::InverseSquaredNormal).unwrap();
        let r = log_transform(sample.as_slice()).unwrap();
        assert_eq!(r.method, TransformMethod::Log);
        assert_eq!(r.parameter, None);
        assert_eq!(r.standardized_values.len(), sample.len());
        assert_standardized(&r.standardized_values);
    }

    #[test]
    fn test_box_cox_transform_standardized() {
        let sample =
            generate_series(5_000, 17, SeriesDistribution::InverseSquaredNormal).unwrap();
        let r = box_cox_transform(sample.as_slice()).unwrap();
        assert_eq!(r.method, TransformMethod::BoxCox);
        let lambda = r.parameter.unwrap();
        assert!((LAMBDA_RANGE.0..=LAMBDA_RANGE.1).contains(&lambda));
        assert_eq!(r.standardized_values.len(), sample.len());
        assert_standardized(&r.standardized_values);
    }

    #[test]
    fn test_box_cox_reduces_skewness() {
        let sample =
            generate_series(5_000, 23, SeriesDistribution::InverseSquaredNormal).unwrap();
        let before = stats::skewness(sample.as_slice()).unwrap();
        let r = box_cox_transform(sample.as_slice()).unwrap();
        let after = stats::skewness(&r.standardized_values).unwrap();
        assert!(after.abs() < before.abs(), "before {before}, after {after}");
        assert!(after.abs() < 0.5, "after {after}");
    }

    #[test]
    fn test_box_cox_matches_log_near_zero_lambda() {
        let sample = mirrored_lognormal(1_000, 1.5, 29);
        let bc = box_cox_transform(&sample).unwrap();
        let lambda = bc.parameter.unwrap();
        assert!(lambda.abs() < 1e-3, "λ {lambda}");

        let log = log_transform(&sample).unwrap();
        for (i, (a, b)) in bc
            .standardized_values
            .iter()
            .zip(&log.standardized_values)
            .enumerate()
        {
            assert!((a - b).abs() < 1e-3, "index {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_box_cox_on_lognormal_series_tracks_log() {
        // λ is estimated here, not forced to zero, so it only lands near 0.
        let n = 20_000;
        let d = SeriesDistribution::LogNormal(LogNormal::new(0.0, 1.0).unwrap());
        let sample = generate_series(n, 43, d).unwrap();
        let bc = box_cox_transform(sample.as_slice()).unwrap();
        let lambda = bc.parameter.unwrap();
        assert!(lambda.abs() < 0.05, "λ {lambda}");

        let log = log_transform(sample.as_slice()).unwrap();
        let (a, b) = (&bc.standardized_values, &log.standardized_values);
        let corr = a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>() / (n - 1) as f64;
        assert!(corr > 0.999, "correlation {corr}");
        let worst = a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max);
        assert!(worst < 0.5, "max difference {worst}");
    }

    #[test]
    fn test_fixed_small_lambda_matches_log() {
        let d = SeriesDistribution::LogNormal(LogNormal::new(0.0, 0.5).unwrap());
        let sample = generate_series(2_000, 31, d).unwrap();
        // smallest λ that still takes the power branch
        let lambda = LOG_TOLERANCE;
        let bc = standardize(&box_cox(sample.as_slice(), lambda).unwrap()).unwrap();
        let log = log_transform(sample.as_slice()).unwrap();
        for (a, b) in bc.iter().zip(&log.standardized_values) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_box_cox_recovers_square_root() {
        // x = (1 + g/4)², so √x is nearly Gaussian and λ should be near 1/2.
        let normal = Normal::new(0.0, 0.25).unwrap();
        let mut rng = create_rng(41);
        let sample: Vec<f64> = (0..5_000)
            .map(|_| {
                let base = (1.0 + normal.sample(&mut rng)).max(0.05);
                base * base
            })
            .collect();
        let lambda = estimate_box_cox_lambda(&sample).unwrap();
        assert!((lambda - 0.5).abs() < 0.15, "λ {lambda}");
    }

    #[test]
    fn test_box_cox_fixed_lambda_values() {
        let y = box_cox(&[1.0, 4.0, 9.0], 0.5).unwrap();
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 2.0).abs() < 1e-12);
        assert!((y[2] - 4.0).abs() < 1e-12);
        let y = box_cox(&[std::f64::consts::E], 0.0).unwrap();
        assert!((y[0] - 1.0).abs() < 1e-15);
        assert!(box_cox(&[1.0], f64::NAN).is_err());
    }

    #[test]
    fn test_box_cox_overflow_is_non_finite() {
        assert_eq!(
            box_cox(&[1.0, 1e300], 5.0),
            Err(StatsError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_non_positive_is_invalid_domain() {
        let sample = [1.0, 2.0, 0.0, 3.0];
        assert_eq!(
            log_transform(&sample),
            Err(StatsError::InvalidDomain {
                index: 2,
                value: 0.0
            })
        );
        assert_eq!(
            box_cox_transform(&[1.0, -2.0]),
            Err(StatsError::InvalidDomain {
                index: 1,
                value: -2.0
            })
        );
        assert!(matches!(
            box_cox(&[-1.0], 1.0),
            Err(StatsError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_non_finite_input() {
        assert_eq!(
            log_transform(&[1.0, f64::NAN]),
            Err(StatsError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_degenerate_sample() {
        assert_eq!(log_transform(&[2.0; 10]), Err(StatsError::DegenerateSample));
        assert_eq!(
            box_cox_transform(&[2.0; 10]),
            Err(StatsError::DegenerateSample)
        );
        assert_eq!(
            box_cox_log_likelihood(&[2.0; 10], 0.5),
            Err(StatsError::DegenerateSample)
        );
    }

    #[test]
    fn test_non_finite_lambda_is_invalid_parameter() {
        for lambda in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                box_cox_log_likelihood(&[1.0, 2.0, 3.0], lambda),
                Err(StatsError::InvalidParameters(_))
            ));
            assert!(matches!(
                box_cox(&[1.0, 2.0, 3.0], lambda),
                Err(StatsError::InvalidParameters(_))
            ));
        }
    }

    #[test]
    fn test_too_short_sample() {
        assert!(matches!(
            log_transform(&[]),
            Err(StatsError::UndefinedStatistic(_))
        ));
        assert!(matches!(
            box_cox_transform(&[3.0]),
            Err(StatsError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_likelihood_peaks_at_estimate() {
        let sample =
            generate_series(2_000, 37, SeriesDistribution::InverseSquaredNormal).unwrap();
        let lambda = estimate_box_cox_lambda(sample.as_slice()).unwrap();
        let at = box_cox_log_likelihood(sample.as_slice(), lambda).unwrap();
        for delta in [-0.2, -0.05, 0.05, 0.2] {
            let other = box_cox_log_likelihood(sample.as_slice(), lambda + delta).unwrap();
            assert!(at >= other, "ℓ({lambda})={at} < ℓ({})={other}", lambda + delta);
        }
    }

    #[test]
    fn test_golden_section_quadratic() {
        let f = |x: f64| -(x - 1.25) * (x - 1.25);
        let x = golden_section_max(&f, -3.0, 4.0, 1e-10);
        assert!((x - 1.25).abs() < 1e-8, "x {x}");
    }
}
