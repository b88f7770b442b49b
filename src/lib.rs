//! # tailstat
//!
//! Running statistics and variance-stabilizing transforms for samples whose
//! mean may not exist.
//!
//! The crate demonstrates, and tests, a classic pathology: for
//! `x = 1/g²` with `g ~ N(0, 1)` the running mean never settles while the
//! running median converges, and a log or Box-Cox transform turns the
//! sample into something close to Gaussian.
//!
//! ## Modules
//!
//! - [`running`] — cumulative mean (O(1) update) and median (two heaps)
//! - [`transform`] — log and Box-Cox transforms with standardization
//! - [`stats`] — batch descriptive statistics used as reference values
//! - [`distributions`] / [`random`] — seeded series generation
//! - [`report`] — the generate → derive → summarize pipeline
//!
//! ## Quick Start
//!
//! ```
//! use tailstat::distributions::SeriesDistribution;
//! use tailstat::{box_cox_transform, generate_series, running_median};
//!
//! let series = generate_series(1_000, 42, SeriesDistribution::InverseSquaredNormal).unwrap();
//! let medians = running_median(series.as_slice()).unwrap();
//! assert_eq!(medians.len(), series.len());
//!
//! let bc = box_cox_transform(series.as_slice()).unwrap();
//! assert!(bc.parameter.is_some());
//! ```
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: empty input, non-positive input to a transform and
//!   zero-variance samples are reported as [`StatsError`] values, never as
//!   silent `NaN`.
//! - **Immutable inputs**: every derived series is a pure function of an
//!   [`ObservationSeries`] plus explicit parameters.

pub mod config;
pub mod distributions;
pub mod error;
pub mod random;
pub mod report;
pub mod running;
pub mod series;
pub mod stats;
pub mod transform;

pub use error::{Result, StatsError};
pub use random::generate_series;
pub use running::{running_mean, running_median, running_statistics, RunningStatisticSample};
pub use series::ObservationSeries;
pub use transform::{box_cox_transform, log_transform, TransformMethod, TransformResult};
