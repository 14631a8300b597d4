//! Error taxonomy for the forecasting engine.
//!
//! Every failure the engine can produce is one of four deterministic
//! input-validation errors. They are raised at the point of detection and
//! surfaced unchanged to the caller; nothing in the core retries.

use std::fmt;

use thiserror::Error;

/// Errors raised by the forecasting engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// The input history is malformed, too short, or contains gaps.
    #[error("invalid series: {0}")]
    InvalidSeries(SeriesDefect),

    /// A smoothing parameter lies outside [0, 1] or is not finite.
    #[error("invalid parameter: {name} = {value} (must be within [0, 1])")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The parameter search produced no usable candidate.
    #[error("optimization failed: {0}")]
    OptimizationFailed(String),

    /// The requested horizon is outside `1..=max`.
    #[error("invalid horizon: {horizon} (must be within 1..={max})")]
    InvalidHorizon { horizon: usize, max: usize },
}

/// What exactly is wrong with a rejected series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesDefect {
    Empty,
    TooShort { len: usize, min: usize },
    /// A blank cell in the history.
    Missing { index: usize },
    NonNumeric { index: usize, raw: String },
    NonFinite { index: usize, value: f64 },
    /// Finite observations whose smoothed states, error, or forecasts
    /// leave the `f64` range.
    Overflow,
}

impl fmt::Display for SeriesDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "series is empty"),
            Self::TooShort { len, min } => {
                write!(f, "series has {len} observation(s), at least {min} required")
            }
            Self::Missing { index } => write!(f, "missing observation at period {index}"),
            Self::NonNumeric { index, raw } => {
                write!(f, "non-numeric observation '{raw}' at period {index}")
            }
            Self::NonFinite { index, value } => {
                write!(f, "non-finite observation {value} at period {index}")
            }
            Self::Overflow => write!(f, "values too large to smooth without overflow"),
        }
    }
}

impl From<SeriesDefect> for ForecastError {
    fn from(defect: SeriesDefect) -> Self {
        Self::InvalidSeries(defect)
    }
}
