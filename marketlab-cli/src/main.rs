//! MarketLab CLI: index snapshot and synthetic historical chart payloads.
//!
//! Commands:
//! - `indices`: print the index catalog snapshot as JSON
//! - `history`: print the historical chart payload for one symbol
//! - `sweep`: generate every timeframe for every index in parallel and
//!   print a summary line per series

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marketlab_core::{
    AppConfig, HistoryService, IndexCatalog, QuoteSource, SeedHierarchy, Series, SeriesRequest,
    Timeframe,
};

#[derive(Parser)]
#[command(
    name = "marketlab",
    about = "MarketLab CLI: market index snapshot and synthetic historical charts"
)]
struct Cli {
    /// Optional TOML config (seed, volatility overrides, indices).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index catalog snapshot.
    Indices,
    /// Print the historical chart payload for a symbol.
    History {
        /// Index symbol (e.g., SPX IXIC DJI), or any ticker with --value.
        symbol: String,

        /// Timeframe tag: 1D, 1M, 3M, 1Y, 5Y, 10Y. Unknown tags fall back to 1Y.
        #[arg(long, default_value = "1Y")]
        timeframe: String,

        /// Current value to anchor the series on, bypassing the catalog.
        #[arg(long)]
        value: Option<f64>,

        /// Master seed for reproducible output. Overrides the config seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Window end (YYYY-MM-DDTHH:MM or YYYY-MM-DD). Defaults to now.
        #[arg(long)]
        end: Option<String>,
    },
    /// Generate every timeframe for every index and print a summary.
    Sweep {
        /// Master seed for reproducible output. Overrides the config seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Window end (YYYY-MM-DDTHH:MM or YYYY-MM-DD). Defaults to now.
        #[arg(long)]
        end: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Indices => run_indices(&config, cli.pretty),
        Commands::History {
            symbol,
            timeframe,
            value,
            seed,
            end,
        } => run_history(&config, &symbol, &timeframe, value, seed, end, cli.pretty),
        Commands::Sweep { seed, end } => run_sweep(&config, seed, end),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let config = AppConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            info!(path = %path.display(), indices = config.indices.len(), "config loaded");
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}

fn parse_end(end: Option<&str>) -> Result<Option<NaiveDateTime>> {
    let Some(raw) = end else {
        return Ok(None);
    };
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(Some(at));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid --end '{raw}'"))?;
    Ok(date.and_hms_opt(0, 0, 0))
}

fn build_service(
    config: &AppConfig,
    seed: Option<u64>,
    end: Option<&str>,
) -> Result<HistoryService<IndexCatalog>> {
    let mut service = HistoryService::new(config.catalog()?, config.generator()?);
    if let Some(seeds) = seed.map(SeedHierarchy::new).or_else(|| config.seeds()) {
        service = service.with_seeds(seeds);
    }
    if let Some(end) = parse_end(end)? {
        service = service.with_end(end);
    }
    Ok(service)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn run_indices(config: &AppConfig, pretty: bool) -> Result<()> {
    let service = build_service(config, None, None)?;
    print_json(&service.indices(), pretty)
}

fn run_history(
    config: &AppConfig,
    symbol: &str,
    timeframe: &str,
    value: Option<f64>,
    seed: Option<u64>,
    end: Option<String>,
    pretty: bool,
) -> Result<()> {
    if timeframe.parse::<Timeframe>().is_err() {
        warn!(timeframe, "unknown timeframe, using 1Y");
    }

    let service = build_service(config, seed, end.as_deref())?;
    let response = match value {
        Some(value) => service.historical_for_value(symbol, value, Some(timeframe))?,
        None => service.historical(symbol, Some(timeframe)),
    };

    print_json(&response, pretty)?;
    if !response.is_success() {
        let known = service.quotes().all();
        let symbols: Vec<&str> = known.iter().map(|q| q.symbol.as_str()).collect();
        bail!(
            "index '{symbol}' not found. Known: {}. Pass --value to chart any ticker",
            symbols.join(", ")
        );
    }
    Ok(())
}

fn run_sweep(config: &AppConfig, seed: Option<u64>, end: Option<String>) -> Result<()> {
    let service = build_service(config, seed, end.as_deref())?;

    let mut requests = Vec::new();
    for quote in service.quotes().all() {
        for timeframe in Timeframe::ALL {
            requests.push(SeriesRequest::new(quote.value, quote.symbol.clone(), timeframe)?);
        }
    }
    info!(series = requests.len(), "sweeping catalog");

    let results: Vec<Series> = requests
        .par_iter()
        .map(|request| service.series(request))
        .collect();

    println!(
        "{:<8} {:>4} {:>7} {:>12} {:>12} {:>12} {:>12}",
        "symbol", "tf", "points", "first", "last", "min", "max"
    );
    for series in &results {
        let Some((lo, hi)) = series.value_range() else {
            warn!(symbol = %series.symbol, timeframe = %series.timeframe, "empty series");
            continue;
        };
        println!(
            "{:<8} {:>4} {:>7} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            series.symbol,
            series.timeframe.tag(),
            series.len(),
            series.first_value().unwrap_or_default(),
            series.last_value().unwrap_or_default(),
            lo,
            hi,
        );
    }

    Ok(())
}
