//! Holtcast Core — Holt's linear exponential smoothing engine.
//!
//! This crate turns a short monthly history into a multi-period forecast:
//! - Series validation (`series`)
//! - Level/trend recursion with first-difference seeding (`smoother`)
//! - Grid search for the smoothing weights (`optimizer`)
//! - Linear extrapolation of the final state (`forecaster`)
//! - Request-scoped entry point and immutable result (`engine`, `result`)
//!
//! Everything here is a pure function of its inputs. No file, network, or
//! environment access happens in this crate.

pub mod engine;
pub mod error;
pub mod forecaster;
pub mod optimizer;
pub mod params;
pub mod result;
pub mod series;
pub mod smoother;

pub use engine::{run_forecast, EngineConfig, ForecastRequest};
pub use error::{ForecastError, SeriesDefect};
pub use forecaster::{ForecastPoint, Forecaster, MAX_HORIZON};
pub use optimizer::{FittedParameters, GridSearch, DEFAULT_RESOLUTION};
pub use params::{ParameterSource, SmoothingParameters, DEFAULT_ALPHA, DEFAULT_BETA};
pub use result::ForecastResult;
pub use series::{validate, TimeSeries, HISTORY_LEN, MIN_SERIES_LEN};
pub use smoother::{smooth, SmoothingState, StateTrajectory};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: value types are Send + Sync so independent
    /// forecasts can run on separate threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<TimeSeries>();
        require_sync::<TimeSeries>();
        require_send::<SmoothingParameters>();
        require_sync::<SmoothingParameters>();
        require_send::<ParameterSource>();
        require_sync::<ParameterSource>();
        require_send::<SmoothingState>();
        require_sync::<SmoothingState>();
        require_send::<StateTrajectory>();
        require_sync::<StateTrajectory>();
        require_send::<ForecastRequest>();
        require_sync::<ForecastRequest>();
        require_send::<ForecastResult>();
        require_sync::<ForecastResult>();
        require_send::<ForecastError>();
        require_sync::<ForecastError>();
        require_send::<EngineConfig>();
        require_sync::<EngineConfig>();
        require_send::<GridSearch>();
        require_sync::<GridSearch>();
    }

    /// Architecture contract: the smoother sees only the series and the
    /// weights. If a third input is ever added, this stops compiling.
    #[test]
    fn smoother_takes_only_series_and_weights() {
        fn _check(
            series: &TimeSeries,
            params: SmoothingParameters,
        ) -> Result<StateTrajectory, ForecastError> {
            smooth(series, params)
        }
    }
}
