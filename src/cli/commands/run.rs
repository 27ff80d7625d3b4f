//! Run command implementation.

use anyhow::{Context, Result};
use newsflow_config::AppConfig;
use newsflow_impact::ImpactScorer;
use newsflow_indicators::IndicatorEngine;
use newsflow_monitor::RunSummary;
use newsflow_pipeline::{to_json, write_predictions, PipelineCoordinator};
use newsflow_signals::SignalGenerator;
use tracing::info;

use super::{normalize_tickers, price_provider, sentiment_provider};
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let tickers = normalize_tickers(&args.tickers);
    if tickers.is_empty() {
        anyhow::bail!("Please provide at least one ticker with --tickers (e.g. --tickers AAPL,MSFT)");
    }

    let mut pipeline = config.pipeline.clone();
    if let Some(secs) = args.timeout_secs {
        pipeline.timeout_secs = Some(secs);
    }
    if let Some(days) = args.lookback_days {
        pipeline.lookback_days = days;
    }
    if let Some(timeframe) = args.timeframe {
        pipeline.timeframe = timeframe;
    }
    if let Some(output) = &args.output {
        pipeline.output_path = output.clone();
    }
    pipeline
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid pipeline settings: {}", e))?;
    let output_path = pipeline.output_path.clone();

    let prices = price_provider(&config.data, args.data.as_deref())?;
    let sentiment_path = args.sentiment.or_else(|| config.sentiment.path.clone());
    let sentiment = sentiment_provider(sentiment_path.as_deref()).await?;

    info!("Starting signal run for {} tickers", tickers.len());
    let coordinator = PipelineCoordinator::new(prices, sentiment, pipeline).with_stages(
        IndicatorEngine::new(&config.indicators),
        ImpactScorer::new(config.impact.clone()),
        SignalGenerator::new(config.signals.clone()),
    );
    let batch = coordinator
        .run(&tickers)
        .await
        .context("Pipeline run failed")?;

    write_predictions(&output_path, &batch.outcomes)
        .await
        .context("Failed to save predictions")?;

    if args.print {
        println!("{}", to_json(&batch.outcomes)?);
    }
    let summary = RunSummary::new(
        batch.run_id,
        batch.market_open,
        &batch.outcomes,
        &batch.cancelled,
    );
    println!("{}", summary);
    info!("Results saved to {:?}", output_path);

    Ok(())
}
