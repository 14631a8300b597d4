//! Grid search for the smoothing weights.
//!
//! Every `(alpha, beta)` on a regular grid over [0, 1]² is scored by its
//! in-sample one-step-ahead SSE. Candidates are independent, so they are
//! scored in parallel and reduced by (SSE, alpha, beta). The reduction only
//! looks at values, so the winner is the same as a sequential scan in
//! ascending (alpha, beta) order would pick, whatever the evaluation order.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::ForecastError;
use crate::params::SmoothingParameters;
use crate::series::TimeSeries;
use crate::smoother::sse_only;

/// Default number of grid steps per axis (step size 0.01).
pub const DEFAULT_RESOLUTION: usize = 100;

/// Weights chosen by the search and the error they achieve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedParameters {
    pub parameters: SmoothingParameters,
    pub sse: f64,
    pub candidates_evaluated: usize,
}

/// Exhaustive search over a `(resolution + 1) x (resolution + 1)` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSearch {
    resolution: usize,
    parallel: bool,
}

impl GridSearch {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            parallel: true,
        }
    }

    /// Enables or disables parallel candidate evaluation.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of candidate pairs on the grid.
    pub fn size(&self) -> usize {
        if self.resolution == 0 {
            0
        } else {
            (self.resolution + 1) * (self.resolution + 1)
        }
    }

    /// Find the weights minimizing in-sample SSE for `series`.
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedParameters, ForecastError> {
        if self.resolution == 0 {
            return Err(ForecastError::OptimizationFailed(
                "grid resolution must be at least 1".into(),
            ));
        }
        if series.len() < 2 {
            return Err(ForecastError::OptimizationFailed(format!(
                "series of length {} has no in-sample errors to minimize",
                series.len()
            )));
        }

        let n = self.resolution + 1;
        let y = series.values();
        let score = |idx: usize| -> Option<Candidate> {
            let (i, j) = (idx / n, idx % n);
            let parameters = SmoothingParameters {
                alpha: i as f64 / self.resolution as f64,
                beta: j as f64 / self.resolution as f64,
            };
            let sse = sse_only(y, parameters);
            sse.is_finite().then_some(Candidate {
                i,
                j,
                parameters,
                sse,
            })
        };

        let best = if self.parallel {
            (0..n * n)
                .into_par_iter()
                .filter_map(score)
                .reduce_with(Candidate::better)
        } else {
            (0..n * n).filter_map(score).reduce(Candidate::better)
        };

        let best = best.ok_or_else(|| {
            ForecastError::OptimizationFailed(
                "no candidate produced a finite in-sample error".into(),
            )
        })?;

        tracing::debug!(
            alpha = best.parameters.alpha,
            beta = best.parameters.beta,
            sse = best.sse,
            candidates = n * n,
            "grid search complete"
        );

        Ok(FittedParameters {
            parameters: best.parameters,
            sse: best.sse,
            candidates_evaluated: n * n,
        })
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    i: usize,
    j: usize,
    parameters: SmoothingParameters,
    sse: f64,
}

impl Candidate {
    /// Lower SSE wins; ties go to the earlier grid point.
    fn better(a: Self, b: Self) -> Self {
        let a_first = (a.i, a.j) < (b.i, b.j);
        if a.sse < b.sse || (a.sse == b.sse && a_first) {
            a
        } else {
            b
        }
    }
}
