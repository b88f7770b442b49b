//! Run configuration for the convergence report.

use serde::Serialize;

/// Parameters of one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    /// Observations drawn per series.
    pub sample_size: usize,
    /// Seed for the Gaussian series; the heavy-tailed series uses `seed + 1`.
    pub seed: u64,
    /// Largest drift between the n/2 and n prefixes still counted as stable.
    pub tolerance: f64,
    /// Emit every `k`-th running sample for plotting; `None` omits the trace.
    pub trace_stride: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sample_size: 20_000,
            seed: 42,
            tolerance: 0.5,
            trace_stride: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(ReportConfig),
    Help,
}

/// Error while parsing or validating command-line arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "unknown flag: {flag}"),
            ConfigError::MissingValue(flag) => write!(f, "missing value for {flag}"),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value for {flag}: {value}")
            }
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const USAGE: &str =
    "Usage: tailstat-report [--n <count>] [--seed <u64>] [--tolerance <f64>] [--trace-every <k>]";

fn parse_value<T: std::str::FromStr>(
    flag: &'static str,
    value: Option<String>,
) -> Result<T, ConfigError> {
    let value = value.ok_or(ConfigError::MissingValue(flag))?;
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { flag, value })
}

impl ReportConfig {
    /// Parses command-line arguments (without the program name).
    ///
    /// Unspecified flags keep their [`Default`] values.
    ///
    /// # Examples
    /// ```
    /// use tailstat::config::{Command, ReportConfig};
    /// let args = ["--n", "1000", "--seed", "7"].map(String::from);
    /// match ReportConfig::from_args(args).unwrap() {
    ///     Command::Run(cfg) => assert_eq!((cfg.sample_size, cfg.seed), (1000, 7)),
    ///     Command::Help => unreachable!(),
    /// }
    /// ```
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, ConfigError> {
        let mut config = ReportConfig::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--n" => config.sample_size = parse_value("--n", args.next())?,
                "--seed" => config.seed = parse_value("--seed", args.next())?,
                "--tolerance" => config.tolerance = parse_value("--tolerance", args.next())?,
                "--trace-every" => {
                    config.trace_stride = Some(parse_value("--trace-every", args.next())?)
                }
                "-h" | "--help" => return Ok(Command::Help),
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        config.validate()?;
        Ok(Command::Run(config))
    }

    /// Checks the invariants the report relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size < 4 {
            return Err(ConfigError::Invalid(format!(
                "sample size must be at least 4, got {}",
                self.sample_size
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.trace_stride == Some(0) {
            return Err(ConfigError::Invalid("trace stride must be positive".into()));
        }
        Ok(())
    }
}
