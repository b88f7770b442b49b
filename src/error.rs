//! Error type shared by every statistic and transform in the crate.

/// Recoverable failure of a statistic or transform.
///
/// Every variant is local to a single call; nothing is retried and no
/// function silently substitutes `NaN` for one of these conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The statistic is undefined for the given input size
    /// (e.g. a mean of nothing, or a sample deviation of one value).
    UndefinedStatistic(&'static str),
    /// A transform requiring strictly positive input received `value`
    /// at position `index`.
    InvalidDomain { index: usize, value: f64 },
    /// The transformed sample has zero variance and cannot be standardized.
    DegenerateSample,
    /// A non-finite value was found (or produced) at position `index`.
    NonFinite { index: usize },
    /// Distribution parameters violate their constraints.
    InvalidParameters(String),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::UndefinedStatistic(what) => write!(f, "undefined statistic: {what}"),
            StatsError::InvalidDomain { index, value } => write!(
                f,
                "invalid domain: value {value} at index {index} is not strictly positive"
            ),
            StatsError::DegenerateSample => {
                write!(f, "degenerate sample: zero variance after transform")
            }
            StatsError::NonFinite { index } => write!(f, "non-finite value at index {index}"),
            StatsError::InvalidParameters(msg) => {
                write!(f, "invalid distribution parameters: {msg}")
            }
        }
    }
}

impl std::error::Error for StatsError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Returns the index of the first non-finite value, if any.
pub(crate) fn first_non_finite(data: &[f64]) -> Option<usize> {
    data.iter().position(|x| !x.is_finite())
}
