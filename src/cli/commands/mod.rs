//! CLI command implementations.

pub mod indicators;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use newsflow_config::{DataSettings, PriceSource};
use newsflow_core::traits::{PriceSeriesProvider, SentimentProvider};
use newsflow_data::{
    AlpacaPriceProvider, CsvPriceProvider, JsonSentimentProvider, StaticSentimentProvider,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Price provider from settings; `data_dir` forces the CSV source.
pub fn price_provider(
    settings: &DataSettings,
    data_dir: Option<&Path>,
) -> Result<Arc<dyn PriceSeriesProvider>> {
    if let Some(dir) = data_dir {
        let provider = CsvPriceProvider::new(dir)
            .with_context(|| format!("Cannot read price data from {}", dir.display()))?;
        return Ok(Arc::new(provider));
    }

    match settings.source {
        PriceSource::Csv => {
            let provider = CsvPriceProvider::new(&settings.csv_dir).with_context(|| {
                format!(
                    "Cannot read price data from {} (set data.csv_dir or pass --data)",
                    settings.csv_dir.display()
                )
            })?;
            Ok(Arc::new(provider))
        }
        PriceSource::Alpaca => {
            let provider = AlpacaPriceProvider::new(settings.alpaca.clone())
                .context("Failed to configure Alpaca provider")?;
            Ok(Arc::new(provider))
        }
    }
}

/// Sentiment provider for an optional JSON file.
pub async fn sentiment_provider(path: Option<&Path>) -> Result<Arc<dyn SentimentProvider>> {
    match path {
        Some(path) => {
            let provider = JsonSentimentProvider::load(path)
                .await
                .with_context(|| format!("Failed to load sentiment from {}", path.display()))?;
            info!(path = %path.display(), "Using sentiment file");
            Ok(Arc::new(provider))
        }
        None => {
            warn!("No sentiment file given; every ticker will be scored without sentiment");
            Ok(Arc::new(StaticSentimentProvider::new()))
        }
    }
}

/// Trim, uppercase and de-duplicate tickers, keeping first occurrence order.
pub fn normalize_tickers(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
