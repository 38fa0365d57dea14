//! Error taxonomy for the signal engine.
//!
//! Every user-visible failure is one `AnalysisError` value with a stable,
//! machine-readable `reason()` string. Degenerate numeric ranges are not
//! errors: strategies fall back to fixed-offset targets and record it in
//! their evidence.

use thiserror::Error;

/// Errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {what} needs {required} candles, got {available}")]
    InsufficientData {
        what: String,
        required: usize,
        available: usize,
    },

    #[error("candle {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("candle {index} has invalid {field}: {value}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("candle {index} is out of order: timestamps must be non-decreasing")]
    UnsortedSeries { index: usize },

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Stable identifier for the error kind, suitable for machine consumption.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidValue { .. } => "invalid_value",
            Self::UnsortedSeries { .. } => "unsorted_series",
            Self::UnknownStrategy(_) => "unknown_strategy",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}
