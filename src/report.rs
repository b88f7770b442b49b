//! Convergence report: generate → derive → summarize.
//!
//! The report contrasts a Gaussian series (finite mean) with an
//! inverse-squared Gaussian series (infinite mean, finite median), then
//! shows how the log and Box-Cox transforms tame the heavy-tailed one.
//! Rendering is left to whoever consumes the serialized report.

use log::info;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::distributions::SeriesDistribution;
use crate::error::{Result, StatsError};
use crate::random::generate_series;
use crate::running::{running_statistics, RunningStatisticSample};
use crate::stats;
use crate::transform::{box_cox_transform, log_transform, TransformMethod, TransformResult};

/// Running statistics at the half-way point and at the end of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceSummary {
    pub distribution: &'static str,
    pub sample_size: usize,
    pub half_mean: f64,
    pub full_mean: f64,
    pub mean_drift: f64,
    pub half_median: f64,
    pub full_median: f64,
    pub median_drift: f64,
    pub mean_stable: bool,
    pub median_stable: bool,
    /// Every `trace_stride`-th running sample, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<RunningStatisticSample>>,
}

impl ConvergenceSummary {
    /// Compares the n/2 and n prefixes of `samples`.
    ///
    /// # Errors
    /// - `UndefinedStatistic` if there are fewer than 2 samples.
    /// - `InvalidParameters` if `trace_stride` is `Some(0)`.
    pub fn from_samples(
        distribution: &'static str,
        samples: &[RunningStatisticSample],
        tolerance: f64,
        trace_stride: Option<usize>,
    ) -> Result<Self> {
        if trace_stride == Some(0) {
            return Err(StatsError::InvalidParameters("trace stride must be positive".into()));
        }
        let n = samples.len();
        if n < 2 {
            return Err(StatsError::UndefinedStatistic(
                "convergence needs at least 2 running samples",
            ));
        }
        let half = &samples[n / 2 - 1];
        let full = &samples[n - 1];
        let mean_drift = (full.cumulative_mean - half.cumulative_mean).abs();
        let median_drift = (full.cumulative_median - half.cumulative_median).abs();
        let trace = trace_stride.map(|k| {
            samples
                .iter()
                .filter(|s| s.index % k == 0 || s.index == n)
                .copied()
                .collect()
        });
        Ok(Self {
            distribution,
            sample_size: n,
            half_mean: half.cumulative_mean,
            full_mean: full.cumulative_mean,
            mean_drift,
            half_median: half.cumulative_median,
            full_median: full.cumulative_median,
            median_drift,
            mean_stable: mean_drift < tolerance,
            median_stable: median_drift < tolerance,
            trace,
        })
    }
}

/// Effect of one transform on the heavy-tailed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformSummary {
    pub method: TransformMethod,
    pub parameter: Option<f64>,
    pub skewness_before: f64,
    pub skewness_after: f64,
}

impl TransformSummary {
    fn new(result: &TransformResult, skewness_before: f64) -> Result<Self> {
        Ok(Self {
            method: result.method,
            parameter: result.parameter,
            skewness_before,
            skewness_after: stats::skewness(&result.standardized_values)?,
        })
    }
}

/// The full report for one [`ReportConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceReport {
    pub config: ReportConfig,
    pub gaussian: ConvergenceSummary,
    pub heavy_tailed: ConvergenceSummary,
    pub transforms: Vec<TransformSummary>,
}

impl ConvergenceReport {
    /// Runs the whole pipeline for `config`.
    ///
    /// # Errors
    /// `InvalidParameters` if `config` fails [`ReportConfig::validate`];
    /// otherwise any [`StatsError`] raised along the way, though with the
    /// built-in distributions none is expected.
    pub fn build(config: &ReportConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| StatsError::InvalidParameters(e.to_string()))?;
        let gaussian = summarize(
            config,
            SeriesDistribution::standard_normal(),
            config.seed,
        )?;

        let heavy_seed = config.seed.wrapping_add(1);
        let heavy = generate_series(
            config.sample_size,
            heavy_seed,
            SeriesDistribution::InverseSquaredNormal,
        )?;
        let heavy_tailed = summarize_series(
            config,
            SeriesDistribution::InverseSquaredNormal,
            heavy.as_slice(),
        )?;

        let skewness_before = stats::skewness(heavy.as_slice())?;
        let transforms = vec![
            TransformSummary::new(&log_transform(heavy.as_slice())?, skewness_before)?,
            TransformSummary::new(&box_cox_transform(heavy.as_slice())?, skewness_before)?,
        ];
        for t in &transforms {
            info!(
                "{:?} transform: skewness {:.3} -> {:.3}",
                t.method, t.skewness_before, t.skewness_after
            );
        }

        Ok(Self {
            config: config.clone(),
            gaussian,
            heavy_tailed,
            transforms,
        })
    }
}

fn summarize(
    config: &ReportConfig,
    distribution: SeriesDistribution,
    seed: u64,
) -> Result<ConvergenceSummary> {
    let series = generate_series(config.sample_size, seed, distribution)?;
    summarize_series(config, distribution, series.as_slice())
}

fn summarize_series(
    config: &ReportConfig,
    distribution: SeriesDistribution,
    series: &[f64],
) -> Result<ConvergenceSummary> {
    let samples = running_statistics(series)?;
    let summary = ConvergenceSummary::from_samples(
        distribution.name(),
        &samples,
        config.tolerance,
        config.trace_stride,
    )?;
    info!(
        "{}: mean drift {:.4} (stable: {}), median drift {:.4} (stable: {})",
        summary.distribution,
        summary.mean_drift,
        summary.mean_stable,
        summary.median_drift,
        summary.median_stable
    );
    Ok(summary)
}
