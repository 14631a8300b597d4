//! Series validation and the validated `TimeSeries` type.
//!
//! A `TimeSeries` can only be obtained through validation, so every later
//! stage (smoother, optimizer) may assume at least two finite observations.

use serde::Serialize;

use crate::error::{ForecastError, SeriesDefect};

/// Holt's method needs two points to seed level and trend.
pub const MIN_SERIES_LEN: usize = 2;

/// Monthly history length used by the sales application.
pub const HISTORY_LEN: usize = 12;

/// Check that `values` is a usable history of at least `min_len` finite points.
///
/// Returns the slice unchanged on success.
pub fn validate(values: &[f64], min_len: usize) -> Result<&[f64], ForecastError> {
    let min = min_len.max(MIN_SERIES_LEN);
    if values.is_empty() {
        return Err(SeriesDefect::Empty.into());
    }
    if values.len() < min {
        return Err(SeriesDefect::TooShort {
            len: values.len(),
            min,
        }
        .into());
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SeriesDefect::NonFinite { index, value }.into());
    }
    Ok(values)
}

/// Ordered observations, oldest first. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    /// Validate and wrap a numeric history.
    pub fn new(values: Vec<f64>) -> Result<Self, ForecastError> {
        validate(&values, MIN_SERIES_LEN)?;
        Ok(Self { values })
    }

    /// Validate with a caller-chosen minimum length (never below 2).
    pub fn with_min_len(values: Vec<f64>, min_len: usize) -> Result<Self, ForecastError> {
        validate(&values, min_len)?;
        Ok(Self { values })
    }

    /// Build a series from raw textual cells, as read from a form or sheet.
    ///
    /// `None` or blank cells are gaps. A decimal comma is accepted.
    pub fn from_cells<S: AsRef<str>>(cells: &[Option<S>]) -> Result<Self, ForecastError> {
        let mut values = Vec::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            let raw = match cell {
                Some(c) if !c.as_ref().trim().is_empty() => c.as_ref().trim(),
                _ => return Err(SeriesDefect::Missing { index }.into()),
            };
            let value = parse_cell(raw).ok_or_else(|| SeriesDefect::NonNumeric {
                index,
                raw: raw.to_string(),
            })?;
            values.push(value);
        }
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: validation rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The most recent observation.
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

fn parse_cell(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .or_else(|| raw.replace(',', ".").parse::<f64>().ok())
}
