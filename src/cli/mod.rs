//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use newsflow_core::types::Timeframe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsflow")]
#[command(author, version, about = "News-driven technical signal pipeline")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate signals for a list of tickers
    Run(RunArgs),
    /// Print the indicator snapshot for one ticker
    Indicators(IndicatorsArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Tickers to analyze (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub tickers: Vec<String>,

    /// Sentiment JSON file keyed by ticker
    #[arg(short, long)]
    pub sentiment: Option<PathBuf>,

    /// Output file for predictions
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory of {TICKER}.csv files (forces the CSV source)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Days of history to fetch
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Bar resolution, e.g. 1d or 1h (overrides the config file)
    #[arg(long)]
    pub timeframe: Option<Timeframe>,

    /// Also print predictions as JSON on stdout
    #[arg(long)]
    pub print: bool,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// Ticker to analyze
    #[arg(short, long)]
    pub ticker: String,

    /// Directory of {TICKER}.csv files (forces the CSV source)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Days of history to fetch
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Bar resolution, e.g. 1d or 1h (overrides the config file)
    #[arg(long)]
    pub timeframe: Option<Timeframe>,
}
