//! Sampling distributions for observation series.
//!
//! | Distribution | Parameters | Mean | Median |
//! |---|---|---|---|
//! | [`Normal`] | μ, σ | μ | μ |
//! | [`LogNormal`] | μ, σ | exp(μ+σ²/2) | exp(μ) |
//! | [`InverseSquaredNormal`] | — | ∞ | 1/(Φ⁻¹(3/4))² ≈ 2.198 |
//!
//! `InverseSquaredNormal` is `1/g²` for `g ~ N(0, 1)`, which is exactly the
//! Lévy(0, 1) law: the median is finite but the mean is not, so running
//! means of its samples never settle.

use rand::Rng;

use crate::error::{Result, StatsError};

/// Normal (Gaussian) distribution N(μ, σ²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates N(μ, σ).
    ///
    /// # Errors
    /// `InvalidParameters` if `sigma ≤ 0` or either parameter is not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(StatsError::InvalidParameters(format!(
                "Normal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// N(0, 1).
    pub fn standard() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
        }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Draws one value.
    ///
    /// # Algorithm
    /// Marsaglia polar method: rejection-sample a point in the unit disc,
    /// then map it to a standard normal deviate. One of the two deviates
    /// it produces is discarded so each call is independent of the last.
    ///
    /// Reference: Marsaglia & Bray (1964), *SIAM Review* 6(3).
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.mu + self.sigma * standard_normal(rng)
    }
}

fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.random_range(-1.0..1.0);
        let v: f64 = rng.random_range(-1.0..1.0);
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// Log-normal distribution: `ln X ~ N(μ, σ²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    normal: Normal,
}

impl LogNormal {
    /// # Errors
    /// `InvalidParameters` if `sigma ≤ 0` or either parameter is not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        Normal::new(mu, sigma)
            .map(|normal| Self { normal })
            .map_err(|_| {
                StatsError::InvalidParameters(format!(
                    "LogNormal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
                ))
            })
    }

    pub fn mu(&self) -> f64 {
        self.normal.mu
    }

    pub fn sigma(&self) -> f64 {
        self.normal.sigma
    }

    /// Mean = exp(μ + σ²/2).
    pub fn mean(&self) -> f64 {
        (self.normal.mu + self.normal.sigma * self.normal.sigma / 2.0).exp()
    }

    /// Median = exp(μ).
    pub fn median(&self) -> f64 {
        self.normal.mu.exp()
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng).exp()
    }
}

/// `1 / g²` with `g ~ N(0, 1)`: infinite mean, finite median.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InverseSquaredNormal;

impl InverseSquaredNormal {
    /// Population median, `1 / Φ⁻¹(0.75)²`.
    pub const MEDIAN: f64 = 2.198109338317732;

    /// Draws one value. An exact-zero Gaussian draw is redrawn, so the
    /// result is always finite and strictly positive.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        loop {
            let g = standard_normal(rng);
            let x = 1.0 / (g * g);
            if x.is_finite() {
                return x;
            }
        }
    }
}

/// The distribution an observation series is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesDistribution {
    Normal(Normal),
    LogNormal(LogNormal),
    InverseSquaredNormal,
}

impl SeriesDistribution {
    /// Standard Gaussian: well-behaved mean and median.
    pub fn standard_normal() -> Self {
        SeriesDistribution::Normal(Normal::standard())
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            SeriesDistribution::Normal(d) => d.sample(rng),
            SeriesDistribution::LogNormal(d) => d.sample(rng),
            SeriesDistribution::InverseSquaredNormal => InverseSquaredNormal.sample(rng),
        }
    }

    /// Short label used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            SeriesDistribution::Normal(_) => "normal",
            SeriesDistribution::LogNormal(_) => "lognormal",
            SeriesDistribution::InverseSquaredNormal => "inverse-squared-normal",
        }
    }
}
