//! In-memory price provider.

use async_trait::async_trait;
use newsflow_core::error::FetchError;
use newsflow_core::traits::PriceSeriesProvider;
use newsflow_core::types::{Bar, FetchWindow, PriceSeries};
use std::collections::HashMap;

/// Bars held in memory, keyed by ticker.
///
/// Serves replays and tests; fetch applies the same window filtering as the
/// file-backed providers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceProvider {
    bars: HashMap<String, Vec<Bar>>,
}

impl InMemoryPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bars for a ticker, replacing any previous entry.
    pub fn insert(&mut self, ticker: impl Into<String>, bars: Vec<Bar>) {
        self.bars.insert(ticker.into(), bars);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_bars(mut self, ticker: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.insert(ticker, bars);
        self
    }
}

#[async_trait]
impl PriceSeriesProvider for InMemoryPriceProvider {
    async fn fetch(&self, ticker: &str, window: &FetchWindow) -> Result<PriceSeries, FetchError> {
        let bars = self
            .bars
            .get(ticker)
            .ok_or_else(|| FetchError::SymbolNotFound(ticker.to_string()))?;

        let in_window = bars
            .iter()
            .filter(|bar| window.contains_millis(bar.timestamp))
            .copied()
            .collect();
        Ok(PriceSeries::from_bars(ticker, window.timeframe, in_window))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
