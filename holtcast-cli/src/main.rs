//! Holtcast CLI — forecast, fit, and batch commands.
//!
//! Commands:
//! - `forecast` — forecast one product from a typed-in or file history
//! - `fit` — report the grid-searched smoothing weights for a history
//! - `batch` — forecast every product in a history file and export each
//!
//! Tables go to stdout; logs go to stderr (`RUST_LOG` controls the level).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use holtcast_core::{
    smooth, ForecastRequest, GridSearch, ParameterSource, SmoothingParameters, TimeSeries,
};
use holtcast_runner::{
    export_history_csv, parse_history_list, run_product, save_artifacts, BatchRunner, Catalog,
    ForecastConfig, HistoryFile, PeriodCalendar, ProductForecast, ProductRequest,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "holtcast",
    about = "Holtcast CLI — monthly sales forecasts with Holt's linear smoothing"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast a single product.
    Forecast {
        #[command(flatten)]
        source: HistorySource,

        /// Article catalog CSV for name/supplier lookup.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Number of months to forecast (1-12). Defaults to the config value.
        #[arg(long)]
        horizon: Option<usize>,

        #[command(flatten)]
        weights: WeightArgs,

        /// Last observed month (YYYY-MM). Defaults to last month.
        #[arg(long)]
        anchor: Option<String>,

        /// Also print the labelled history.
        #[arg(long, default_value_t = false)]
        show_history: bool,

        /// Write forecast CSV and JSON manifest here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Search the smoothing weights that best fit a history.
    Fit {
        #[command(flatten)]
        source: HistorySource,

        /// Grid steps per axis. Defaults to the config value.
        #[arg(long)]
        resolution: Option<usize>,
    },
    /// Forecast every product in a history file.
    Batch {
        /// History CSV: a code column followed by twelve month columns.
        #[arg(long)]
        history_file: PathBuf,

        /// Article catalog CSV; products missing from it are skipped.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Number of months to forecast (1-12). Defaults to the config value.
        #[arg(long)]
        horizon: Option<usize>,

        #[command(flatten)]
        weights: WeightArgs,

        /// Last observed month (YYYY-MM). Defaults to last month.
        #[arg(long)]
        anchor: Option<String>,

        /// Output directory for per-product artifacts.
        #[arg(long, default_value = "forecasts")]
        output_dir: PathBuf,

        /// Run products one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

#[derive(Args)]
struct HistorySource {
    /// Twelve monthly values, oldest first, separated by commas (or semicolons).
    #[arg(long, conflicts_with = "history_file")]
    history: Option<String>,

    /// History CSV file (requires --code).
    #[arg(long, requires = "code")]
    history_file: Option<PathBuf>,

    /// Product code to select from the history file.
    #[arg(long)]
    code: Option<String>,
}

#[derive(Args)]
struct WeightArgs {
    /// Level weight in [0, 1].
    #[arg(long, conflicts_with = "auto")]
    alpha: Option<f64>,

    /// Trend weight in [0, 1].
    #[arg(long, conflicts_with = "auto")]
    beta: Option<f64>,

    /// Fit the weights by grid search.
    #[arg(long, default_value_t = false)]
    auto: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let config = ForecastConfig::from_file(path)?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => ForecastConfig::default(),
    };

    match cli.command {
        Commands::Forecast {
            source,
            catalog,
            horizon,
            weights,
            anchor,
            show_history,
            output_dir,
        } => run_forecast_cmd(
            &config,
            source,
            catalog.as_deref(),
            horizon,
            &weights,
            anchor.as_deref(),
            show_history,
            output_dir.as_deref(),
        ),
        Commands::Fit { source, resolution } => run_fit_cmd(&config, source, resolution),
        Commands::Batch {
            history_file,
            catalog,
            horizon,
            weights,
            anchor,
            output_dir,
            sequential,
        } => run_batch_cmd(
            &config,
            &history_file,
            catalog.as_deref(),
            horizon,
            &weights,
            anchor.as_deref(),
            &output_dir,
            sequential,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_forecast_cmd(
    config: &ForecastConfig,
    source: HistorySource,
    catalog_path: Option<&Path>,
    horizon: Option<usize>,
    weights: &WeightArgs,
    anchor: Option<&str>,
    show_history: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    let (code, series) = load_series(&source)?;

    let article = match (catalog_path, code.as_deref()) {
        (Some(path), Some(code)) => Some(Catalog::from_file(path)?.lookup(code)?.clone()),
        (Some(_), None) => bail!("--catalog needs --code to look the article up"),
        _ => None,
    };

    let product = ProductRequest {
        code,
        article,
        request: ForecastRequest::new(
            series,
            parameter_source(config, weights)?,
            horizon.unwrap_or(config.forecast.horizon),
        ),
        calendar: calendar(anchor)?,
    };

    let forecast = run_product(&product, config)?;

    if show_history {
        print!("{}", export_history_csv(&forecast, &config.export)?);
        println!();
    }
    print_summary(&forecast, config.export.decimals);

    if let Some(dir) = output_dir {
        let path = save_artifacts(&forecast, dir, &config.export)?;
        println!("Forecast saved to: {}", path.display());
    }

    Ok(())
}

fn run_fit_cmd(
    config: &ForecastConfig,
    source: HistorySource,
    resolution: Option<usize>,
) -> Result<()> {
    let (_, series) = load_series(&source)?;
    let search = GridSearch::new(resolution.unwrap_or(config.optimizer.resolution))
        .with_parallelism(config.optimizer.parallel);
    let fit = search.fit(&series)?;

    let default = SmoothingParameters::default();
    let default_sse = smooth(&series, default)?.sse(&series);

    println!();
    println!("=== Fitted Weights ===");
    println!("Alpha:          {:.2}", fit.parameters.alpha);
    println!("Beta:           {:.2}", fit.parameters.beta);
    println!("In-sample SSE:  {:.4}", fit.sse);
    println!("Candidates:     {}", fit.candidates_evaluated);
    println!(
        "Default SSE:    {:.4} (alpha {:.2}, beta {:.2})",
        default_sse, default.alpha, default.beta
    );
    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_batch_cmd(
    config: &ForecastConfig,
    history_file: &Path,
    catalog_path: Option<&Path>,
    horizon: Option<usize>,
    weights: &WeightArgs,
    anchor: Option<&str>,
    output_dir: &Path,
    sequential: bool,
) -> Result<()> {
    let history = HistoryFile::from_file(history_file)?;
    let catalog = catalog_path.map(Catalog::from_file).transpose()?;

    let mut runner = BatchRunner::new(config, calendar(anchor)?)
        .with_parameters(parameter_source(config, weights)?);
    if let Some(h) = horizon {
        runner = runner.with_horizon(h);
    }
    if sequential {
        runner = runner.with_parallelism(false);
    }

    let results = runner.run(&history, catalog.as_ref());

    let mut saved = 0usize;
    for forecast in results.succeeded() {
        save_artifacts(forecast, output_dir, &config.export)?;
        saved += 1;
    }

    println!();
    println!("=== Batch Result ===");
    println!("Products:       {}", results.len());
    println!("Forecast:       {saved}");
    println!("Skipped:        {}", results.failed().count());
    for (code, err) in results.failed() {
        println!("  {code}: {err}");
    }
    println!("Output:         {}", output_dir.display());
    println!();

    if saved == 0 && !results.is_empty() {
        bail!("no product could be forecast");
    }
    Ok(())
}

fn load_series(source: &HistorySource) -> Result<(Option<String>, TimeSeries)> {
    match (&source.history, &source.history_file, &source.code) {
        (Some(raw), None, code) => {
            let series = parse_history_list(raw).context("invalid --history")?;
            Ok((code.clone(), series))
        }
        (None, Some(path), Some(code)) => {
            let file = HistoryFile::from_file(path)?;
            let series = file.row(code)?.to_series()?;
            Ok((Some(code.clone()), series))
        }
        _ => bail!("one of --history or --history-file with --code is required"),
    }
}

/// Command-line weights override the config; a lone alpha or beta keeps
/// the config's value for the other.
fn parameter_source(config: &ForecastConfig, weights: &WeightArgs) -> Result<ParameterSource> {
    if weights.auto {
        return Ok(ParameterSource::AutoFit);
    }
    if weights.alpha.is_none() && weights.beta.is_none() {
        return Ok(config.parameter_source());
    }
    let params = SmoothingParameters::new(
        weights.alpha.unwrap_or(config.smoothing.alpha),
        weights.beta.unwrap_or(config.smoothing.beta),
    )?;
    Ok(ParameterSource::Explicit(params))
}

fn calendar(anchor: Option<&str>) -> Result<PeriodCalendar> {
    match anchor {
        Some(raw) => PeriodCalendar::parse(raw)
            .with_context(|| format!("invalid --anchor '{raw}', expected YYYY-MM")),
        None => Ok(PeriodCalendar::last_complete_month(
            chrono::Local::now().date_naive(),
        )),
    }
}

fn print_summary(forecast: &ProductForecast, decimals: usize) {
    let result = &forecast.result;
    let params = result.parameters();

    println!();
    println!("=== Forecast ===");
    if let Some(code) = &forecast.code {
        println!("Code:           {code}");
    }
    if let Some(article) = &forecast.article {
        println!("Article:        {}", article.name);
        println!("Supplier:       {}", article.supplier);
    }
    println!(
        "Weights:        alpha {:.2}, beta {:.2}{}",
        params.alpha,
        params.beta,
        if result.auto_fitted() { " (fitted)" } else { "" }
    );
    println!("In-sample SSE:  {:.4}", result.in_sample_sse());
    println!(
        "Final state:    level {:.2}, trend {:.2}",
        result.final_state().level,
        result.final_state().trend
    );
    println!();
    println!("{:<16} {:>12}", "Period", "Forecast");
    println!("{}", "-".repeat(29));
    for (label, value) in forecast.rows() {
        println!("{:<16} {:>12.*}", label, decimals, value);
    }
    println!();
}
