//! Sentiment providers.
//!
//! Sentiment is produced outside this system; these providers only hand
//! over what the collaborator already wrote down.

use async_trait::async_trait;
use newsflow_core::error::SentimentError;
use newsflow_core::traits::SentimentProvider;
use newsflow_core::types::ExternalSentiment;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Fixed per-ticker sentiment.
///
/// Tickers are matched case-insensitively. Scores outside [-1, 1] are
/// rejected at lookup time so the scorer sees the failure as degraded input.
#[derive(Debug, Clone, Default)]
pub struct StaticSentimentProvider {
    entries: HashMap<String, ExternalSentiment>,
}

impl StaticSentimentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: HashMap<String, ExternalSentiment>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(ticker, sentiment)| (ticker.to_uppercase(), sentiment))
            .collect();
        Self { entries }
    }

    pub fn with_sentiment(mut self, ticker: &str, sentiment: ExternalSentiment) -> Self {
        self.entries.insert(ticker.to_uppercase(), sentiment);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SentimentProvider for StaticSentimentProvider {
    async fn sentiment(&self, ticker: &str) -> Result<Option<ExternalSentiment>, SentimentError> {
        match self.entries.get(&ticker.to_uppercase()) {
            Some(sentiment) => {
                sentiment.validate()?;
                Ok(Some(sentiment.clone()))
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Sentiment read from a JSON object keyed by ticker:
///
/// ```json
/// { "AAPL": { "score": 0.6, "rationale": "beat", "company_name": "Apple Inc." } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonSentimentProvider {
    inner: StaticSentimentProvider,
}

impl JsonSentimentProvider {
    /// Load the file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SentimentError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SentimentError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let provider = Self::from_json(&content)?;
        debug!(path = %path.display(), entries = provider.inner.len(), "Loaded sentiment file");
        Ok(provider)
    }

    /// Parse JSON content.
    pub fn from_json(content: &str) -> Result<Self, SentimentError> {
        let entries: HashMap<String, ExternalSentiment> = serde_json::from_str(content)
            .map_err(|e| SentimentError::Invalid(e.to_string()))?;
        for (ticker, sentiment) in &entries {
            if sentiment.validate().is_err() {
                warn!(ticker = %ticker, score = sentiment.score, "Sentiment score out of range");
            }
        }
        Ok(Self {
            inner: StaticSentimentProvider::from_map(entries),
        })
    }
}

#[async_trait]
impl SentimentProvider for JsonSentimentProvider {
    async fn sentiment(&self, ticker: &str) -> Result<Option<ExternalSentiment>, SentimentError> {
        self.inner.sentiment(ticker).await
    }

    fn name(&self) -> &str {
        "json"
    }
}
