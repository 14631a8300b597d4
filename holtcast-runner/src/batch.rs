//! Batch forecasting over every product in a history file.
//!
//! Products are independent, so they run on the rayon pool by default.
//! A failing product is recorded next to its code instead of aborting the
//! batch; results keep file order whatever the execution order was.

use rayon::prelude::*;

use holtcast_core::{ForecastRequest, ParameterSource};

use crate::catalog::Catalog;
use crate::config::ForecastConfig;
use crate::ingest::{HistoryFile, HistoryRow};
use crate::labels::PeriodCalendar;
use crate::runner::{run_product, ProductForecast, ProductRequest, RunError};

/// Batch executor.
pub struct BatchRunner<'a> {
    config: &'a ForecastConfig,
    calendar: PeriodCalendar,
    parameters: ParameterSource,
    horizon: usize,
    parallel: bool,
}

/// One product's outcome.
#[derive(Debug)]
pub struct BatchEntry {
    pub code: String,
    pub outcome: Result<ProductForecast, RunError>,
}

/// Outcomes for a whole history file, in file order.
#[derive(Debug, Default)]
pub struct BatchResults {
    entries: Vec<BatchEntry>,
}

impl<'a> BatchRunner<'a> {
    /// Horizon and weight source default to the config's values.
    pub fn new(config: &'a ForecastConfig, calendar: PeriodCalendar) -> Self {
        Self {
            config,
            calendar,
            parameters: config.parameter_source(),
            horizon: config.forecast.horizon,
            parallel: config.optimizer.parallel,
        }
    }

    pub fn with_parameters(mut self, parameters: ParameterSource) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Forecast every row of `history`.
    pub fn run(&self, history: &HistoryFile, catalog: Option<&Catalog>) -> BatchResults {
        self.run_with_progress(history, catalog, |_, _, _| {})
    }

    /// Forecast every row, invoking `progress(index, total, entry)` as each
    /// product finishes. With parallel execution the calls arrive out of order.
    pub fn run_with_progress<F>(
        &self,
        history: &HistoryFile,
        catalog: Option<&Catalog>,
        progress: F,
    ) -> BatchResults
    where
        F: Fn(usize, usize, &BatchEntry) + Send + Sync,
    {
        let total = history.rows.len();
        tracing::info!(products = total, parallel = self.parallel, "batch started");

        let run_one = |(idx, row): (usize, &HistoryRow)| {
            let outcome = self.forecast_row(row, catalog);
            let entry = BatchEntry {
                code: row.code.clone(),
                outcome,
            };
            if let Err(e) = &entry.outcome {
                tracing::warn!(code = %entry.code, error = %e, "product skipped");
            }
            progress(idx, total, &entry);
            entry
        };

        let entries: Vec<BatchEntry> = if self.parallel {
            history.rows.par_iter().enumerate().map(run_one).collect()
        } else {
            history.rows.iter().enumerate().map(run_one).collect()
        };

        let results = BatchResults { entries };
        tracing::info!(
            succeeded = results.succeeded().count(),
            failed = results.failed().count(),
            "batch finished"
        );
        results
    }

    fn forecast_row(
        &self,
        row: &HistoryRow,
        catalog: Option<&Catalog>,
    ) -> Result<ProductForecast, RunError> {
        let series = row.to_series()?;
        let article = catalog.map(|c| c.lookup(&row.code)).transpose()?.cloned();
        let product = ProductRequest {
            code: Some(row.code.clone()),
            article,
            request: ForecastRequest::new(series, self.parameters, self.horizon),
            calendar: self.calendar,
        };
        run_product(&product, self.config)
    }
}

impl BatchResults {
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ProductForecast> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &RunError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.code.as_str(), err)))
    }
}
