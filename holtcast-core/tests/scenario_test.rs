//! End-to-end engine scenarios on fixed monthly histories.

use holtcast_core::{
    run_forecast, smooth, EngineConfig, ForecastError, ForecastRequest, GridSearch,
    ParameterSource, SeriesDefect, SmoothingParameters, SmoothingState, TimeSeries,
};

fn linear_sales() -> TimeSeries {
    TimeSeries::new(vec![
        100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0, 200.0, 210.0,
    ])
    .unwrap()
}

fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}

#[test]
fn linear_series_is_reproduced_exactly() {
    let series = linear_sales();
    let params = SmoothingParameters::new(0.5, 0.5).unwrap();
    let traj = smooth(&series, params).unwrap();

    assert_eq!(
        traj.seed(),
        SmoothingState {
            level: 100.0,
            trend: 10.0
        }
    );
    for (state, &y) in traj.states().iter().zip(series.values()) {
        assert_approx(state.level, y, 1e-9);
        assert_approx(state.trend, 10.0, 1e-9);
    }
    assert_approx(traj.sse(&series), 0.0, 1e-12);

    let final_state = traj.final_state();
    assert_approx(final_state.level, 210.0, 1e-9);
    assert_approx(final_state.trend, 10.0, 1e-9);
}

#[test]
fn linear_series_three_month_forecast() {
    let req = ForecastRequest::new(
        linear_sales(),
        ParameterSource::Explicit(SmoothingParameters::new(0.5, 0.5).unwrap()),
        3,
    );
    let result = run_forecast(&req, &EngineConfig::default()).unwrap();
    let values = result.values();
    assert_eq!(values.len(), 3);
    assert_approx(values[0], 220.0, 1e-9);
    assert_approx(values[1], 230.0, 1e-9);
    assert_approx(values[2], 240.0, 1e-9);
    let offsets: Vec<usize> = result.points().iter().map(|p| p.offset).collect();
    assert_eq!(offsets, vec![1, 2, 3]);
}

#[test]
fn linear_series_auto_fit_has_zero_error() {
    let req = ForecastRequest::new(linear_sales(), ParameterSource::AutoFit, 12);
    let result = run_forecast(&req, &EngineConfig::default()).unwrap();
    assert!(result.auto_fitted());
    assert_approx(result.in_sample_sse(), 0.0, 1e-9);
    assert_approx(result.values()[11], 330.0, 1e-6);

    let fit = GridSearch::default().fit(&linear_sales()).unwrap();
    assert_approx(fit.sse, 0.0, 1e-9);
    assert_eq!(fit.candidates_evaluated, 101 * 101);
}

#[test]
fn boundary_inputs() {
    // Length 2 accepted, 1 and 0 rejected.
    assert!(TimeSeries::new(vec![10.0, 12.0]).is_ok());
    assert!(matches!(
        TimeSeries::new(vec![10.0]),
        Err(ForecastError::InvalidSeries(SeriesDefect::TooShort { .. }))
    ));
    assert!(matches!(
        TimeSeries::new(vec![]),
        Err(ForecastError::InvalidSeries(SeriesDefect::Empty))
    ));

    // Horizons 0 and 13 rejected.
    for horizon in [0, 13] {
        let req = ForecastRequest::new(linear_sales(), ParameterSource::default(), horizon);
        assert_eq!(
            run_forecast(&req, &EngineConfig::default()),
            Err(ForecastError::InvalidHorizon { horizon, max: 12 })
        );
    }

    // alpha = 1.2 rejected.
    assert!(matches!(
        SmoothingParameters::new(1.2, 0.1),
        Err(ForecastError::InvalidParameter { name: "alpha", .. })
    ));
}

#[test]
fn two_point_history_forecasts_its_slope() {
    let req = ForecastRequest::new(
        TimeSeries::new(vec![40.0, 46.0]).unwrap(),
        ParameterSource::default(),
        2,
    );
    let result = run_forecast(&req, &EngineConfig::default()).unwrap();
    let v = result.values();
    assert_approx(v[0], 52.0, 1e-9);
    assert_approx(v[1], 58.0, 1e-9);
}

#[test]
fn default_weights_on_seasonal_looking_sales() {
    // Default weights (0.2, 0.1) on a noisy upward history.
    let series = TimeSeries::new(vec![
        120.0, 135.0, 128.0, 150.0, 161.0, 149.0, 170.0, 182.0, 176.0, 195.0, 204.0, 199.0,
    ])
    .unwrap();
    let req = ForecastRequest::new(series.clone(), ParameterSource::default(), 6);
    let explicit = run_forecast(&req, &EngineConfig::default()).unwrap();

    let req = ForecastRequest::new(series, ParameterSource::AutoFit, 6);
    let fitted = run_forecast(&req, &EngineConfig::default()).unwrap();

    // Grid includes (0.2, 0.1), so the fitted error can only be lower or equal.
    assert!(fitted.in_sample_sse() <= explicit.in_sample_sse());
    // Upward history, upward forecast.
    let v = explicit.values();
    assert!(v.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn result_serializes_for_export() {
    let req = ForecastRequest::new(linear_sales(), ParameterSource::default(), 2);
    let result = run_forecast(&req, &EngineConfig::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["points"].as_array().unwrap().len(), 2);
    assert_eq!(json["parameters"]["alpha"], 0.2);
    assert_eq!(json["auto_fitted"], false);
}
