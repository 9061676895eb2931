/// Error types for the TR-55 engine
use thiserror::Error;

/// Main error type for TR-55 operations
#[derive(Error, Debug)]
pub enum Tr55Error {
    /// Rainfall, curve number, area, or timing value outside its valid range
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Duration is not one of the supported distribution categories
    #[error("unsupported storm duration: {0} hours")]
    UnsupportedDuration(f64),

    /// Malformed temporal distribution data
    #[error("invalid temporal distribution: {0}")]
    InvalidDistribution(String),

    /// Distribution source could not be reached or timed out
    #[error("temporal distribution source unavailable: {0}")]
    SourceUnavailable(String),

    /// A sequence that must be non-empty was empty
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}

impl From<reqwest::Error> for Tr55Error {
    fn from(err: reqwest::Error) -> Self {
        Tr55Error::SourceUnavailable(err.to_string())
    }
}

impl From<csv::Error> for Tr55Error {
    fn from(err: csv::Error) -> Self {
        Tr55Error::InvalidDistribution(err.to_string())
    }
}

/// Type alias for Results using Tr55Error
pub type Result<T> = std::result::Result<T, Tr55Error>;
