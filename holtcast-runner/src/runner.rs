//! Single-product runner — wires catalog, history, engine, and labels.
//!
//! Two entry points:
//! - `run_product()`: takes an already-built request. Used by batch mode.
//! - `run_from_history()`: looks the product up in a history file and an
//!   optional catalog first. Used by the CLI.

use holtcast_core::{run_forecast, ForecastError, ForecastRequest, ForecastResult, ParameterSource};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Article, Catalog, CatalogError};
use crate::config::ForecastConfig;
use crate::ingest::{HistoryFile, IngestError};
use crate::labels::PeriodCalendar;

/// Current schema version for persisted manifests.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("history is all zeros; enter the sales history before forecasting")]
    EmptyHistory,
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("history error: {0}")]
    Ingest(#[from] IngestError),
    #[error("failed to fingerprint request: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// A forecast request plus the product context around it.
#[derive(Debug, Clone)]
pub struct ProductRequest {
    pub code: Option<String>,
    pub article: Option<Article>,
    pub request: ForecastRequest,
    pub calendar: PeriodCalendar,
}

/// Complete result of one product forecast.
#[derive(Debug, Clone, Serialize)]
pub struct ProductForecast {
    pub schema_version: u32,
    pub code: Option<String>,
    pub article: Option<Article>,
    pub history: Vec<f64>,
    pub history_labels: Vec<String>,
    pub forecast_labels: Vec<String>,
    pub result: ForecastResult,
    /// BLAKE3 over the serialized request; equal requests share it.
    pub fingerprint: String,
}

impl ProductForecast {
    /// `(label, value)` rows for tables and CSV export.
    pub fn rows(&self) -> Vec<(&str, f64)> {
        self.forecast_labels
            .iter()
            .map(String::as_str)
            .zip(self.result.values())
            .collect()
    }
}

/// Deterministic content hash of a request.
pub fn request_fingerprint(request: &ForecastRequest) -> Result<String, RunError> {
    let json = serde_json::to_string(request)?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

/// Run one product forecast with pre-built inputs. Does no I/O.
pub fn run_product(
    product: &ProductRequest,
    config: &ForecastConfig,
) -> Result<ProductForecast, RunError> {
    let series = &product.request.series;
    if series.values().iter().all(|v| *v == 0.0) {
        return Err(RunError::EmptyHistory);
    }

    let result = run_forecast(&product.request, &config.engine_config())?;
    let fingerprint = request_fingerprint(&product.request)?;

    Ok(ProductForecast {
        schema_version: SCHEMA_VERSION,
        code: product.code.clone(),
        article: product.article.clone(),
        history: series.values().to_vec(),
        history_labels: product.calendar.history_labels(series.len()),
        forecast_labels: product.calendar.forecast_labels(result.horizon()),
        result,
        fingerprint,
    })
}

/// Look up `code` in the history file (and catalog, when given), then run.
pub fn run_from_history(
    code: &str,
    history: &HistoryFile,
    catalog: Option<&Catalog>,
    parameters: ParameterSource,
    horizon: usize,
    calendar: PeriodCalendar,
    config: &ForecastConfig,
) -> Result<ProductForecast, RunError> {
    let series = history.row(code)?.to_series()?;
    let article = catalog.map(|c| c.lookup(code)).transpose()?.cloned();
    let product = ProductRequest {
        code: Some(code.trim().to_string()),
        article,
        request: ForecastRequest::new(series, parameters, horizon),
        calendar,
    };
    run_product(&product, config)
}
