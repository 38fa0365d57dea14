//! ChaseProfit CLI — analyse candle CSV files and print the JSON report.
//!
//! Commands:
//! - `analyze`: one CSV file, consensus or a single strategy
//! - `batch`: many CSV files in parallel, JSON array in input order
//! - `synthetic`: write a seeded random-walk candle CSV
//! - `strategies`: list strategy keys and their fusion weights
//!
//! Reports go to stdout; logs go to stderr (`RUST_LOG`, default
//! `chaseprofit=info`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chaseprofit_core::{
    analyze_raw, AnalysisConfig, AnalysisReport, AnalysisRequest, StrategyKind, StrategySelection,
};
use chaseprofit_runner::{
    analyze_files, generate, load_csv, load_error_payload, write_csv, BatchInput, SyntheticConfig,
};

#[derive(Parser)]
#[command(
    name = "chaseprofit",
    about = "ChaseProfit CLI — technical-analysis signals from OHLCV candles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one candle CSV file.
    Analyze {
        /// CSV with timestamp, open, high, low, close, volume columns.
        csv: PathBuf,

        /// Symbol echoed in the report. Defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        #[command(flatten)]
        opts: AnalysisOpts,
    },
    /// Analyse several CSV files in parallel.
    Batch {
        #[arg(required = true)]
        csv: Vec<PathBuf>,

        #[command(flatten)]
        opts: AnalysisOpts,
    },
    /// Write a seeded random-walk candle CSV.
    Synthetic {
        /// Number of candles.
        #[arg(long, default_value_t = 200)]
        candles: usize,

        /// RNG seed; the same seed always gives the same file.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Opening price of the first candle.
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// List strategy keys and fusion weights.
    Strategies {
        /// Optional TOML config whose weights to show.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct AnalysisOpts {
    /// ALL for the weighted consensus, or one strategy key (e.g. RSI_MACD).
    #[arg(long, default_value = "ALL")]
    strategy: StrategySelection,

    /// Timeframe label echoed in the report.
    #[arg(long, default_value = "1h")]
    timeframe: String,

    /// TOML file overriding engine parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { csv, symbol, opts } => run_analyze(&csv, symbol, &opts),
        Commands::Batch { csv, opts } => run_batch(&csv, &opts),
        Commands::Synthetic {
            candles,
            seed,
            start_price,
            output,
        } => run_synthetic(candles, seed, start_price, &output),
        Commands::Strategies { config } => run_strategies(config.as_deref()),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chaseprofit=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}

fn run_analyze(csv: &Path, symbol: Option<String>, opts: &AnalysisOpts) -> Result<()> {
    let config = load_config(opts.config.as_deref())?;
    let request = AnalysisRequest::new(symbol.unwrap_or_else(|| symbol_for(csv)), &opts.timeframe)
        .with_selection(opts.strategy);

    // Load failures still produce a report so callers always get the contract.
    let report = match load_csv(csv) {
        Ok(raw) => analyze_raw(&request, &raw, &config),
        Err(err) => AnalysisReport::failed(&request, &config, 0, load_error_payload(&err)),
    };
    print_json(&report, opts.compact)
}

fn run_batch(paths: &[PathBuf], opts: &AnalysisOpts) -> Result<()> {
    let config = load_config(opts.config.as_deref())?;
    let inputs: Vec<BatchInput> = paths
        .iter()
        .map(|p| {
            let request =
                AnalysisRequest::new(symbol_for(p), &opts.timeframe).with_selection(opts.strategy);
            BatchInput::new(request, p)
        })
        .collect();
    let reports = analyze_files(&inputs, &config);
    print_json(&reports, opts.compact)
}

fn run_synthetic(candles: usize, seed: u64, start_price: f64, output: &Path) -> Result<()> {
    anyhow::ensure!(
        start_price.is_finite() && start_price > 0.0,
        "--start-price must be a positive number"
    );
    let config = SyntheticConfig {
        candles,
        seed,
        start_price,
        ..Default::default()
    };
    write_csv(output, &generate(&config))
        .with_context(|| format!("writing {}", output.display()))?;
    info!(candles, seed, output = %output.display(), "synthetic data written");
    Ok(())
}

#[derive(Serialize)]
struct StrategyInfo {
    key: &'static str,
    description: &'static str,
    weight: f64,
}

fn run_strategies(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let list: Vec<StrategyInfo> = StrategyKind::ALL
        .iter()
        .map(|kind| StrategyInfo {
            key: kind.key(),
            description: kind.description(),
            weight: kind.weight(&config.weights),
        })
        .collect();
    print_json(&list, false)
}
