//! Linear extrapolation of the final smoothing state.
//!
//! `F(h) = L_n + h · T_n` for `h = 1..=H`.

use serde::Serialize;

use crate::error::ForecastError;
use crate::smoother::SmoothingState;

/// Largest horizon the application allows.
pub const MAX_HORIZON: usize = 12;

/// A forecast value `offset` periods after the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub offset: usize,
    pub value: f64,
}

/// Projects a final state forward, bounded by a maximum horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forecaster {
    max_horizon: usize,
}

impl Forecaster {
    pub fn new(max_horizon: usize) -> Self {
        Self { max_horizon }
    }

    pub fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    /// Checks `1 <= horizon <= max_horizon`.
    pub fn check_horizon(&self, horizon: usize) -> Result<(), ForecastError> {
        if horizon == 0 || horizon > self.max_horizon {
            return Err(ForecastError::InvalidHorizon {
                horizon,
                max: self.max_horizon,
            });
        }
        Ok(())
    }

    /// Point forecasts for offsets 1 through `horizon`.
    pub fn forecast(
        &self,
        state: SmoothingState,
        horizon: usize,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        self.check_horizon(horizon)?;
        Ok((1..=horizon)
            .map(|h| ForecastPoint {
                offset: h,
                value: state.level + h as f64 * state.trend,
            })
            .collect())
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(MAX_HORIZON)
    }
}
