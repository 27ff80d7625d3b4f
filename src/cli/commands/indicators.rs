//! Indicators command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use newsflow_config::AppConfig;
use newsflow_core::types::FetchWindow;
use newsflow_indicators::IndicatorEngine;
use tracing::info;

use super::price_provider;
use crate::cli::IndicatorsArgs;

pub async fn run(args: IndicatorsArgs, config: AppConfig) -> Result<()> {
    let ticker = args.ticker.trim().to_uppercase();
    let provider = price_provider(&config.data, args.data.as_deref())?;

    let lookback = args.lookback_days.unwrap_or(config.pipeline.lookback_days);
    let timeframe = args.timeframe.unwrap_or(config.pipeline.timeframe);
    let window = FetchWindow::lookback(Utc::now(), lookback, timeframe);
    let series = provider
        .fetch(&ticker, &window)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", ticker, provider.name()))?;
    info!("Loaded {} bars for {}", series.len(), ticker);

    let snapshot = IndicatorEngine::new(&config.indicators)
        .compute(&series)
        .with_context(|| format!("Cannot compute indicators for {}", ticker))?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
