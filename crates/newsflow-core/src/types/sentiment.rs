//! Sentiment supplied by the external text-analysis collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Structured sentiment for one ticker.
///
/// The pipeline treats this as opaque input: it never derives or revises the
/// score itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSentiment {
    /// Sentiment in [-1, 1]; negative is bearish
    pub score: f64,
    /// Free-text reasoning from the collaborator
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ExternalSentiment {
    /// Create a sentiment with just a score and rationale.
    pub fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
            company_name: None,
            headline: None,
            source: None,
            published_at: None,
        }
    }

    /// Attach the company name reported alongside the news item.
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Reject scores outside [-1, 1] or not finite.
    pub fn validate(&self) -> Result<(), SentimentError> {
        if !self.score.is_finite() || !(-1.0..=1.0).contains(&self.score) {
            return Err(SentimentError::Invalid(format!(
                "score {} outside [-1, 1]",
                self.score
            )));
        }
        Ok(())
    }

    /// Score magnitude in [0, 1].
    pub fn magnitude(&self) -> f64 {
        self.score.abs().min(1.0)
    }
}
