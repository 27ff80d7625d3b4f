//! Trading signal types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
            Direction::Hold => "hold",
        };
        write!(f, "{}", s)
    }
}

/// Inclusive price band for entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.low && price <= self.high
    }
}

/// Executable signal for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub ticker: String,
    pub company_name: String,
    pub direction: Direction,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Holding horizon, e.g. "2h"
    pub timeframe: String,
    pub entry_range: PriceRange,
    #[serde(with = "rust_decimal::serde::float")]
    pub stop_loss: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_target: Decimal,
    /// Distance from entry to stop, per share
    #[serde(with = "rust_decimal::serde::float")]
    pub max_risk: Decimal,
    pub rationale: String,
    pub generated_at: DateTime<Utc>,
}

/// Marker emitted in place of a signal when a ticker could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

impl SkippedTicker {
    pub fn new(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }
}

/// Terminal per-ticker result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignalOutcome {
    Signal(TradingSignal),
    Skipped(SkippedTicker),
}

impl SignalOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            SignalOutcome::Signal(signal) => &signal.ticker,
            SignalOutcome::Skipped(skipped) => &skipped.ticker,
        }
    }

    pub fn as_signal(&self) -> Option<&TradingSignal> {
        match self {
            SignalOutcome::Signal(signal) => Some(signal),
            SignalOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SignalOutcome::Skipped(_))
    }
}
