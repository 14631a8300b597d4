//! The value handed to presentation and export code.

use serde::Serialize;

use crate::forecaster::ForecastPoint;
use crate::params::SmoothingParameters;
use crate::smoother::SmoothingState;

/// Immutable outcome of one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    parameters: SmoothingParameters,
    in_sample_sse: f64,
    auto_fitted: bool,
    final_state: SmoothingState,
}

impl ForecastResult {
    pub(crate) fn new(
        points: Vec<ForecastPoint>,
        parameters: SmoothingParameters,
        in_sample_sse: f64,
        auto_fitted: bool,
        final_state: SmoothingState,
    ) -> Self {
        Self {
            points,
            parameters,
            in_sample_sse,
            auto_fitted,
            final_state,
        }
    }

    /// Forecasts for offsets `1..=horizon`, in order.
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Just the forecast values, in offset order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn parameters(&self) -> SmoothingParameters {
        self.parameters
    }

    /// Sum of squared one-step-ahead errors over the history.
    pub fn in_sample_sse(&self) -> f64 {
        self.in_sample_sse
    }

    /// True when the weights came from the grid search.
    pub fn auto_fitted(&self) -> bool {
        self.auto_fitted
    }

    pub fn final_state(&self) -> SmoothingState {
        self.final_state
    }
}
