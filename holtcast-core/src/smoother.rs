//! Holt's linear (double) exponential smoothing.
//!
//! ```text
//! Seed:    L_0 = y_0,  T_0 = y_1 - y_0
//! Level:   L_t = α y_t + (1 - α)(L_{t-1} + T_{t-1})
//! Trend:   T_t = β (L_t - L_{t-1}) + (1 - β) T_{t-1}
//! ```
//!
//! Each state depends only on the previous state and the current
//! observation. The trajectory has one entry per observed period; entry 0
//! is the seed.

use serde::Serialize;

use crate::error::ForecastError;
use crate::params::SmoothingParameters;
use crate::series::TimeSeries;

/// Level and trend at one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothingState {
    pub level: f64,
    pub trend: f64,
}

impl SmoothingState {
    /// One-step-ahead projection from this state.
    #[inline]
    pub fn projected(&self) -> f64 {
        self.level + self.trend
    }

    /// Apply one Holt update for observation `y`.
    #[inline]
    pub fn step(&self, y: f64, params: SmoothingParameters) -> Self {
        let level = params.alpha * y + (1.0 - params.alpha) * self.projected();
        let trend = params.beta * (level - self.level) + (1.0 - params.beta) * self.trend;
        Self { level, trend }
    }
}

/// Every smoothing state produced for a series, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTrajectory {
    states: Vec<SmoothingState>,
}

impl StateTrajectory {
    pub fn states(&self) -> &[SmoothingState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn seed(&self) -> SmoothingState {
        self.states[0]
    }

    /// State after the last observation; the forecast origin.
    pub fn final_state(&self) -> SmoothingState {
        self.states[self.states.len() - 1]
    }

    /// One-step-ahead fitted values for periods 1..N-1.
    pub fn fitted(&self) -> Vec<f64> {
        self.states
            .iter()
            .take(self.states.len().saturating_sub(1))
            .map(SmoothingState::projected)
            .collect()
    }

    /// Observation minus fitted value for periods 1..N-1.
    pub fn residuals(&self, series: &TimeSeries) -> Vec<f64> {
        series
            .values()
            .iter()
            .skip(1)
            .zip(self.states.iter())
            .map(|(y, prev)| y - prev.projected())
            .collect()
    }

    /// In-sample sum of squared one-step-ahead errors.
    pub fn sse(&self, series: &TimeSeries) -> f64 {
        self.residuals(series).iter().map(|e| e * e).sum()
    }
}

/// Smooth `series` with `params`, returning the full state trajectory.
pub fn smooth(
    series: &TimeSeries,
    params: SmoothingParameters,
) -> Result<StateTrajectory, ForecastError> {
    params.validate()?;

    let y = series.values();
    let mut states = Vec::with_capacity(y.len());
    let mut state = SmoothingState {
        level: y[0],
        trend: y[1] - y[0],
    };
    states.push(state);

    for &obs in &y[1..] {
        state = state.step(obs, params);
        states.push(state);
    }

    Ok(StateTrajectory { states })
}

/// In-sample SSE without materializing the trajectory.
///
/// Used by the optimizer's inner loop; agrees exactly with
/// `smooth(..)?.sse(..)` because the same update is applied in the same order.
pub(crate) fn sse_only(y: &[f64], params: SmoothingParameters) -> f64 {
    let mut state = SmoothingState {
        level: y[0],
        trend: y[1] - y[0],
    };
    let mut sse = 0.0;
    for &obs in &y[1..] {
        let e = obs - state.projected();
        sse += e * e;
        state = state.step(obs, params);
    }
    sse
}
