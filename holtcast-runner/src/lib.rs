//! Holtcast Runner — everything around the engine that touches the outside world.
//!
//! This crate builds on `holtcast-core` to provide:
//! - TOML configuration with application defaults
//! - Article catalog lookup by product code
//! - Monthly history ingestion from CSV
//! - Calendar labels for history and forecast periods
//! - Single-product and parallel batch runs
//! - CSV and JSON export

pub mod batch;
pub mod catalog;
pub mod config;
pub mod export;
pub mod ingest;
pub mod labels;
pub mod runner;

pub use batch::{BatchEntry, BatchResults, BatchRunner};
pub use catalog::{Article, Catalog, CatalogError};
pub use config::{ConfigError, ForecastConfig, SmoothingMode};
pub use export::{export_forecast_csv, export_history_csv, export_json, save_artifacts};
pub use ingest::{parse_history_list, HistoryFile, HistoryRow, IngestError};
pub use labels::PeriodCalendar;
pub use runner::{
    request_fingerprint, run_from_history, run_product, ProductForecast, ProductRequest,
    RunError, SCHEMA_VERSION,
};
