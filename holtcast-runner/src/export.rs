//! Export — CSV forecast tables and JSON manifests.
//!
//! CSV uses the configured delimiter (`;` by default, as spreadsheet
//! software in comma-decimal locales expects). Values are written at full
//! precision unless `csv_decimals` is set; display rounding never reaches
//! the files. The manifest carries the full unrounded result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ExportSection;
use crate::runner::ProductForecast;

// ─── CSV export ─────────────────────────────────────────────────────

/// Forecast table with `period` and `forecast` columns.
pub fn export_forecast_csv(forecast: &ProductForecast, opts: &ExportSection) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(opts.delimiter_byte()?)
        .from_writer(vec![]);

    wtr.write_record(["period", "forecast"])?;
    for (label, value) in forecast.rows() {
        wtr.write_record([label, opts.csv_value(value).as_str()])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// History table with `period` and `value` columns.
pub fn export_history_csv(forecast: &ProductForecast, opts: &ExportSection) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(opts.delimiter_byte()?)
        .from_writer(vec![]);

    wtr.write_record(["period", "value"])?;
    for (label, value) in forecast.history_labels.iter().zip(&forecast.history) {
        wtr.write_record([label.as_str(), opts.csv_value(*value).as_str()])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ProductForecast` to pretty JSON.
pub fn export_json(forecast: &ProductForecast) -> Result<String> {
    serde_json::to_string_pretty(forecast).context("failed to serialize forecast to JSON")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// File name for a product's forecast table.
pub fn forecast_file_name(forecast: &ProductForecast) -> String {
    match &forecast.code {
        Some(code) => format!("forecast_{}.csv", sanitize(code)),
        None => "forecast.csv".to_string(),
    }
}

/// Save the forecast table and manifest for one product.
///
/// Writes `forecast_{code}.csv` and `forecast_{code}.json` into `output_dir`
/// (created if needed) and returns the CSV path.
pub fn save_artifacts(
    forecast: &ProductForecast,
    output_dir: &Path,
    opts: &ExportSection,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let csv_path = output_dir.join(forecast_file_name(forecast));
    std::fs::write(&csv_path, export_forecast_csv(forecast, opts)?)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    let json_path = csv_path.with_extension("json");
    std::fs::write(&json_path, export_json(forecast)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    tracing::info!(path = %csv_path.display(), "forecast exported");
    Ok(csv_path)
}

/// Keep codes usable as file names.
fn sanitize(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
