//! Collaborator traits for price and sentiment inputs.

use crate::error::{FetchError, SentimentError};
use crate::types::{ExternalSentiment, FetchWindow, PriceSeries};
use async_trait::async_trait;

/// Source of historical OHLCV bars.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Fetch bars for `ticker` over `window`.
    ///
    /// # Returns
    /// A series ordered from oldest to newest. An empty series is a valid
    /// answer; the analysis stage decides what to do with it.
    async fn fetch(&self, ticker: &str, window: &FetchWindow) -> Result<PriceSeries, FetchError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Source of externally produced sentiment.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Sentiment for `ticker`, or `None` when the collaborator has nothing
    /// for it.
    async fn sentiment(&self, ticker: &str) -> Result<Option<ExternalSentiment>, SentimentError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
