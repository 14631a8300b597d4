//! Smoothing parameters and how a request chooses them.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Level weight used when the caller does not choose one.
pub const DEFAULT_ALPHA: f64 = 0.2;
/// Trend weight used when the caller does not choose one.
pub const DEFAULT_BETA: f64 = 0.1;

/// Holt smoothing weights, both within [0, 1].
///
/// `alpha` controls how quickly the level follows new observations,
/// `beta` how quickly the trend follows level changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParameters {
    pub alpha: f64,
    pub beta: f64,
}

impl SmoothingParameters {
    /// Creates a validated parameter pair.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, ForecastError> {
        let params = Self { alpha, beta };
        params.validate()?;
        Ok(params)
    }

    /// Re-checks the range invariant.
    ///
    /// Fields are public and may come from deserialization, so the smoother
    /// calls this before every run.
    pub fn validate(&self) -> Result<(), ForecastError> {
        check_unit("alpha", self.alpha)?;
        check_unit("beta", self.beta)
    }
}

impl Default for SmoothingParameters {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ForecastError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ForecastError::InvalidParameter { name, value })
    }
}

/// Where the smoothing weights for a run come from.
///
/// Explicit weights and automatic fitting are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParameterSource {
    /// Use these weights as given.
    Explicit(SmoothingParameters),
    /// Search for the weights minimizing in-sample squared error.
    AutoFit,
}

impl Default for ParameterSource {
    fn default() -> Self {
        Self::Explicit(SmoothingParameters::default())
    }
}
