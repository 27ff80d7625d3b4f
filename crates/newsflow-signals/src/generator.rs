//! Signal generator.
//!
//! Direction rule: oversold RSI plus a fresh MACD histogram flip is a buy,
//! overbought RSI plus a flip is a sell, anything else is a hold. Price
//! levels come from [`LevelPolicy`].

use chrono::Utc;
use newsflow_core::error::{IndicatorError, SignalError};
use newsflow_core::types::{
    Direction, HistogramCross, IndicatorSnapshot, NewsImpactRecord, SignalOutcome, SkippedTicker,
    TradingSignal,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::levels::LevelPolicy;

/// Thresholds and sizing for signal generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// RSI below this is oversold
    pub oversold: f64,
    /// RSI above this is overbought
    pub overbought: f64,
    /// Holding horizon written on every signal
    pub horizon: String,
    /// Confidence multiplier when sentiment points against the direction
    pub opposing_sentiment_factor: f64,
    pub levels: LevelPolicy,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            horizon: "2h".to_string(),
            opposing_sentiment_factor: 0.5,
            levels: LevelPolicy::default(),
        }
    }
}

impl SignalConfig {
    /// Check threshold consistency.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err("RSI thresholds must be within [0, 100]".to_string());
        }
        if self.oversold >= self.overbought {
            return Err("oversold must be below overbought".to_string());
        }
        if !(0.0..=1.0).contains(&self.opposing_sentiment_factor) {
            return Err("opposing_sentiment_factor must be within [0, 1]".to_string());
        }
        if self.levels.min_move_pct < 0.0 || self.levels.stop_ratio <= 0.0 {
            return Err("min_move_pct must be >= 0 and stop_ratio > 0".to_string());
        }
        if self.horizon.trim().is_empty() {
            return Err("horizon must not be empty".to_string());
        }
        Ok(())
    }
}

/// Output of the analysis stage for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTicker {
    pub snapshot: IndicatorSnapshot,
    pub record: NewsImpactRecord,
    /// Display name from the news context, if any
    pub company_name: Option<String>,
}

/// Maps an impact record and its snapshot to a trading signal.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Direction implied by the latest RSI and histogram flip.
    pub fn direction(&self, snapshot: &IndicatorSnapshot) -> Direction {
        match (snapshot.latest_rsi(), snapshot.histogram_cross()) {
            (Some(rsi), Some(_)) if rsi < self.config.oversold => Direction::Buy,
            (Some(rsi), Some(_)) if rsi > self.config.overbought => Direction::Sell,
            _ => Direction::Hold,
        }
    }

    /// Build the signal for one ticker. `company_name` falls back to the ticker.
    ///
    /// Fails when the close or expected move cannot be expressed as decimal
    /// price levels.
    pub fn generate(
        &self,
        record: &NewsImpactRecord,
        snapshot: &IndicatorSnapshot,
        company_name: Option<&str>,
    ) -> Result<TradingSignal, SignalError> {
        let direction = self.direction(snapshot);
        let close = snapshot.latest_close().unwrap_or(f64::NAN);
        let levels = self
            .config
            .levels
            .levels(close, record.expected_move_pct, direction)?;

        let opposed = match direction {
            Direction::Buy => record.sentiment_score < 0.0,
            Direction::Sell => record.sentiment_score > 0.0,
            Direction::Hold => false,
        };
        let mut confidence = record.confidence;
        if opposed {
            confidence *= self.config.opposing_sentiment_factor;
        }
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        debug!(
            ticker = %record.ticker,
            %direction,
            confidence,
            degraded = record.is_degraded(),
            "Generated signal"
        );

        Ok(TradingSignal {
            ticker: record.ticker.clone(),
            company_name: company_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(record.ticker.as_str())
                .to_string(),
            direction,
            confidence,
            timeframe: self.config.horizon.clone(),
            entry_range: levels.entry_range,
            stop_loss: levels.stop_loss,
            price_target: levels.price_target,
            max_risk: levels.max_risk,
            rationale: self.rationale(record, snapshot, direction, opposed),
            generated_at: Utc::now(),
        })
    }

    fn rationale(
        &self,
        record: &NewsImpactRecord,
        snapshot: &IndicatorSnapshot,
        direction: Direction,
        opposed: bool,
    ) -> String {
        let rsi = snapshot.latest_rsi().unwrap_or(f64::NAN);
        let flip = match snapshot.histogram_cross() {
            Some(HistogramCross::Bullish) => "bullish MACD histogram flip",
            Some(HistogramCross::Bearish) => "bearish MACD histogram flip",
            None => "no MACD histogram flip",
        };
        let setup = match direction {
            Direction::Buy => format!("RSI {:.1} oversold with {}", rsi, flip),
            Direction::Sell => format!("RSI {:.1} overbought with {}", rsi, flip),
            Direction::Hold => format!("no actionable setup: RSI {:.1}, {}", rsi, flip),
        };

        let mut text = format!(
            "{}; urgency {:.1}/5, expected move {:.2}%",
            setup, record.technical_urgency, record.expected_move_pct
        );
        if let (Some(close), Some(fast), Some(slow)) = (
            snapshot.latest_close(),
            snapshot.latest_sma20(),
            snapshot.latest_sma50(),
        ) {
            let side = |ma: f64| if close >= ma { "above" } else { "below" };
            text.push_str(&format!(
                "; close {} SMA20 and {} SMA50",
                side(fast),
                side(slow)
            ));
        }
        match &record.degraded {
            Some(reason) => text.push_str(&format!("; {}, confidence withheld", reason)),
            None => text.push_str(&format!("; sentiment {:+.2}", record.sentiment_score)),
        }
        if opposed {
            text.push_str(" (sentiment disagrees with technicals)");
        }
        text
    }

    /// Terminal outcome for one ticker. Upstream indicator failures and
    /// unpriceable levels become a skipped marker, never a signal.
    pub fn resolve(
        &self,
        ticker: &str,
        analysis: Result<AnalyzedTicker, IndicatorError>,
    ) -> SignalOutcome {
        let analyzed = match analysis {
            Ok(analyzed) => analyzed,
            Err(err) => {
                warn!(ticker, error = %err, "Skipping ticker");
                return SignalOutcome::Skipped(SkippedTicker::new(ticker, err.to_string()));
            }
        };
        match self.generate(
            &analyzed.record,
            &analyzed.snapshot,
            analyzed.company_name.as_deref(),
        ) {
            Ok(signal) => SignalOutcome::Signal(signal),
            Err(err) => {
                warn!(ticker, error = %err, "Skipping ticker with unpriceable levels");
                SignalOutcome::Skipped(SkippedTicker::new(ticker, err.to_string()))
            }
        }
    }

    /// Pick one signal from conflicting candidates for the same ticker.
    ///
    /// The highest confidence wins; ties keep the earliest candidate.
    pub fn reconcile(candidates: impl IntoIterator<Item = TradingSignal>) -> Option<TradingSignal> {
        candidates.into_iter().fold(None, |best, candidate| match best {
            Some(current) if candidate.confidence <= current.confidence => Some(current),
            _ => Some(candidate),
        })
    }
}
