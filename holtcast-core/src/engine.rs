//! Engine entry point: request in, `ForecastResult` out.
//!
//! Pipeline: validated series → weights (explicit or grid search) →
//! smoother → final state → forecaster → result. The request is borrowed
//! and never modified; nothing survives between calls.

use serde::Serialize;

use crate::error::{ForecastError, SeriesDefect};
use crate::forecaster::{Forecaster, MAX_HORIZON};
use crate::optimizer::{GridSearch, DEFAULT_RESOLUTION};
use crate::params::ParameterSource;
use crate::result::ForecastResult;
use crate::series::{validate, TimeSeries, MIN_SERIES_LEN};
use crate::smoother::smooth;

/// Everything one forecast needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRequest {
    pub series: TimeSeries,
    pub parameters: ParameterSource,
    pub horizon: usize,
}

impl ForecastRequest {
    pub fn new(series: TimeSeries, parameters: ParameterSource, horizon: usize) -> Self {
        Self {
            series,
            parameters,
            horizon,
        }
    }
}

/// Bounds and search settings for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_horizon: usize,
    pub grid_resolution: usize,
    pub min_series_len: usize,
    /// Evaluate grid candidates on the rayon pool.
    pub parallel_search: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_horizon: MAX_HORIZON,
            grid_resolution: DEFAULT_RESOLUTION,
            min_series_len: MIN_SERIES_LEN,
            parallel_search: true,
        }
    }
}

/// Run a complete forecast.
pub fn run_forecast(
    request: &ForecastRequest,
    config: &EngineConfig,
) -> Result<ForecastResult, ForecastError> {
    let forecaster = Forecaster::new(config.max_horizon);
    // Fail fast on the cheap checks before any search.
    forecaster.check_horizon(request.horizon)?;
    validate(request.series.values(), config.min_series_len)?;

    let (parameters, auto_fitted) = match request.parameters {
        ParameterSource::Explicit(p) => {
            p.validate()?;
            (p, false)
        }
        ParameterSource::AutoFit => {
            let fit = GridSearch::new(config.grid_resolution)
                .with_parallelism(config.parallel_search)
                .fit(&request.series)?;
            (fit.parameters, true)
        }
    };

    let trajectory = smooth(&request.series, parameters)?;
    let final_state = trajectory.final_state();
    let sse = trajectory.sse(&request.series);
    let points = forecaster.forecast(final_state, request.horizon)?;

    let overflowed = !sse.is_finite()
        || !final_state.level.is_finite()
        || !final_state.trend.is_finite()
        || points.iter().any(|p| !p.value.is_finite());
    if overflowed {
        return Err(SeriesDefect::Overflow.into());
    }

    tracing::debug!(
        periods = request.series.len(),
        horizon = request.horizon,
        alpha = parameters.alpha,
        beta = parameters.beta,
        auto_fitted,
        sse,
        "forecast computed"
    );

    Ok(ForecastResult::new(
        points,
        parameters,
        sse,
        auto_fitted,
        final_state,
    ))
}
