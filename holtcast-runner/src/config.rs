//! TOML forecast configuration.
//!
//! Every field has a default, so an empty file is a valid config. The
//! defaults reproduce the sales application: 6-month horizon, explicit
//! weights (0.2, 0.1), semicolon-separated export.

use std::path::Path;

use holtcast_core::{
    EngineConfig, ParameterSource, SmoothingParameters, DEFAULT_ALPHA, DEFAULT_BETA,
    DEFAULT_RESOLUTION, MAX_HORIZON, MIN_SERIES_LEN,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete forecast configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub forecast: HorizonSection,
    pub smoothing: SmoothingSection,
    pub optimizer: OptimizerSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonSection {
    pub horizon: usize,
    pub max_horizon: usize,
}

impl Default for HorizonSection {
    fn default() -> Self {
        Self {
            horizon: 6,
            max_horizon: MAX_HORIZON,
        }
    }
}

/// How the smoothing weights are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    #[default]
    Explicit,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSection {
    pub mode: SmoothingMode,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for SmoothingSection {
    fn default() -> Self {
        Self {
            mode: SmoothingMode::Explicit,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSection {
    pub resolution: usize,
    pub parallel: bool,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            parallel: true,
        }
    }
}

/// Output formatting. `decimals` rounds the printed tables only; CSV files
/// keep full precision unless `csv_decimals` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub delimiter: char,
    pub decimals: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_decimals: Option<usize>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimals: 2,
            csv_decimals: None,
        }
    }
}

impl ExportSection {
    /// The delimiter as the single byte the CSV writer needs.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::Invalid(format!(
                "export.delimiter '{}' must be a single ASCII character",
                self.delimiter
            )))
        }
    }

    /// Format a value for a CSV cell.
    pub fn csv_value(&self, value: f64) -> String {
        match self.csv_decimals {
            Some(decimals) => format!("{value:.decimals$}"),
            None => value.to_string(),
        }
    }
}

impl ForecastConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.forecast.max_horizon;
        if max == 0 || max > MAX_HORIZON {
            return Err(ConfigError::Invalid(format!(
                "forecast.max_horizon = {max}, must be within 1..={MAX_HORIZON}"
            )));
        }
        if self.forecast.horizon == 0 || self.forecast.horizon > max {
            return Err(ConfigError::Invalid(format!(
                "forecast.horizon = {}, must be within 1..={max}",
                self.forecast.horizon
            )));
        }
        if self.optimizer.resolution == 0 {
            return Err(ConfigError::Invalid(
                "optimizer.resolution must be at least 1".into(),
            ));
        }
        if self.smoothing.mode == SmoothingMode::Explicit {
            SmoothingParameters::new(self.smoothing.alpha, self.smoothing.beta)
                .map_err(|e| ConfigError::Invalid(format!("smoothing: {e}")))?;
        }
        self.export.delimiter_byte()?;
        Ok(())
    }

    /// The weight source this config selects.
    pub fn parameter_source(&self) -> ParameterSource {
        match self.smoothing.mode {
            SmoothingMode::Auto => ParameterSource::AutoFit,
            SmoothingMode::Explicit => ParameterSource::Explicit(SmoothingParameters {
                alpha: self.smoothing.alpha,
                beta: self.smoothing.beta,
            }),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_horizon: self.forecast.max_horizon,
            grid_resolution: self.optimizer.resolution,
            min_series_len: MIN_SERIES_LEN,
            parallel_search: self.optimizer.parallel,
        }
    }
}
