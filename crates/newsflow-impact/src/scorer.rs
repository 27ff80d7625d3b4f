//! Impact scorer.

use newsflow_core::types::{ExternalSentiment, IndicatorSnapshot, NewsImpactRecord};
use newsflow_indicators::realized_volatility_pct;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MIN_URGENCY: f64 = 1.0;
const MAX_URGENCY: f64 = 5.0;

/// Scoring coefficients.
///
/// Only the shape is fixed: urgency never decreases as RSI moves further
/// past a band or when the MACD histogram flips, and the expected move is
/// never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactWeights {
    /// RSI level below which a ticker is oversold
    pub oversold: f64,
    /// RSI level above which a ticker is overbought
    pub overbought: f64,
    /// Urgency added at maximum RSI extremity
    pub rsi_weight: f64,
    /// Urgency added by a fresh MACD histogram flip
    pub cross_weight: f64,
    /// Expected-move multiplier per unit of sentiment magnitude
    pub sentiment_move_weight: f64,
    /// Share of confidence taken from sentiment magnitude
    pub sentiment_confidence_weight: f64,
    /// Share of confidence taken from normalized urgency
    pub urgency_confidence_weight: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            rsi_weight: 2.0,
            cross_weight: 2.0,
            sentiment_move_weight: 1.5,
            sentiment_confidence_weight: 0.6,
            urgency_confidence_weight: 0.4,
        }
    }
}

/// Turns sentiment plus an indicator snapshot into an impact record.
#[derive(Debug, Clone, Default)]
pub struct ImpactScorer {
    weights: ImpactWeights,
}

impl ImpactScorer {
    pub fn new(weights: ImpactWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ImpactWeights {
        &self.weights
    }

    /// Distance of `rsi` beyond the nearer band, normalized to [0, 1].
    fn rsi_extremity(&self, rsi: f64) -> f64 {
        let w = &self.weights;
        if rsi < w.oversold && w.oversold > 0.0 {
            ((w.oversold - rsi) / w.oversold).clamp(0.0, 1.0)
        } else if rsi > w.overbought && w.overbought < 100.0 {
            ((rsi - w.overbought) / (100.0 - w.overbought)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Urgency in [1, 5] from RSI extremity and a fresh histogram flip.
    pub fn technical_urgency(&self, snapshot: &IndicatorSnapshot) -> f64 {
        let extremity = snapshot
            .latest_rsi()
            .map(|rsi| self.rsi_extremity(rsi))
            .unwrap_or(0.0);
        let cross = if snapshot.histogram_cross().is_some() {
            1.0
        } else {
            0.0
        };

        let urgency = MIN_URGENCY
            + self.weights.rsi_weight.max(0.0) * extremity
            + self.weights.cross_weight.max(0.0) * cross;
        urgency.clamp(MIN_URGENCY, MAX_URGENCY)
    }

    /// Score one ticker. `sentiment` is `None` when the collaborator failed
    /// or had nothing; the record is still produced with zero confidence.
    pub fn score(
        &self,
        ticker: &str,
        sentiment: Option<&ExternalSentiment>,
        snapshot: &IndicatorSnapshot,
    ) -> NewsImpactRecord {
        let urgency = self.technical_urgency(snapshot);
        let volatility_pct = realized_volatility_pct(&snapshot.close);
        let sentiment_score = sentiment
            .map(|s| s.score)
            .filter(|s| s.is_finite())
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0);
        let magnitude = sentiment_score.abs();

        let expected_move_pct =
            (volatility_pct * (1.0 + self.weights.sentiment_move_weight.max(0.0) * magnitude))
                .max(0.0);

        let (confidence, degraded) = match sentiment {
            Some(_) => {
                let normalized_urgency = (urgency - MIN_URGENCY) / (MAX_URGENCY - MIN_URGENCY);
                let confidence = self.weights.sentiment_confidence_weight * magnitude
                    + self.weights.urgency_confidence_weight * normalized_urgency;
                (confidence.clamp(0.0, 1.0), None)
            }
            None => (0.0, Some("sentiment unavailable".to_string())),
        };

        debug!(
            ticker,
            window = snapshot.window_len(),
            macd = ?snapshot.latest_macd(),
            urgency,
            volatility_pct,
            expected_move_pct,
            confidence,
            "Scored news impact"
        );

        NewsImpactRecord {
            ticker: ticker.to_string(),
            sentiment_score,
            technical_urgency: urgency,
            expected_move_pct,
            confidence,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(rsi: f64, histogram: Vec<f64>, close: Vec<f64>) -> IndicatorSnapshot {
        let len = histogram.len();
        IndicatorSnapshot {
            ticker: "TEST".to_string(),
            as_of: Utc::now(),
            close,
            sma20: vec![100.0; len],
            sma50: vec![100.0; len],
            rsi14: vec![rsi; len],
            macd: vec![0.0; len],
            macd_signal: vec![0.0; len],
            macd_histogram: histogram,
        }
    }

    fn choppy_closes() -> Vec<f64> {
        vec![100.0, 102.0, 99.0, 101.0, 98.0, 103.0, 100.0, 104.0, 101.0, 102.0]
    }

    #[test]
    fn test_urgency_neutral_is_minimum() {
        let scorer = ImpactScorer::default();
        let snap = snapshot(50.0, vec![0.1, 0.2], vec![100.0, 100.0]);
        assert_eq!(scorer.technical_urgency(&snap), 1.0);
    }

    #[test]
    fn test_urgency_monotonic_in_rsi_extremity() {
        let scorer = ImpactScorer::default();
        let no_cross = vec![0.1, 0.2];

        let mut previous = scorer.technical_urgency(&snapshot(70.0, no_cross.clone(), vec![]));
        for rsi in [72.0, 75.0, 80.0, 90.0, 99.0] {
            let urgency = scorer.technical_urgency(&snapshot(rsi, no_cross.clone(), vec![]));
            assert!(urgency >= previous, "urgency dropped at rsi {}", rsi);
            previous = urgency;
        }

        let mut previous = scorer.technical_urgency(&snapshot(30.0, no_cross.clone(), vec![]));
        for rsi in [28.0, 20.0, 10.0, 1.0] {
            let urgency = scorer.technical_urgency(&snapshot(rsi, no_cross.clone(), vec![]));
            assert!(urgency >= previous, "urgency dropped at rsi {}", rsi);
            previous = urgency;
        }
    }

    #[test]
    fn test_cross_increases_urgency() {
        let scorer = ImpactScorer::default();
        for rsi in [15.0, 50.0, 85.0] {
            let without = scorer.technical_urgency(&snapshot(rsi, vec![0.2, 0.1], vec![]));
            let with = scorer.technical_urgency(&snapshot(rsi, vec![0.2, -0.1], vec![]));
            assert!(with > without);
            assert!((1.0..=5.0).contains(&with));
        }
    }

    #[test]
    fn test_urgency_capped_at_five() {
        let scorer = ImpactScorer::default();
        let urgency = scorer.technical_urgency(&snapshot(100.0, vec![0.2, -0.1], vec![]));
        assert_eq!(urgency, 5.0);
    }

    #[test]
    fn test_missing_sentiment_zero_confidence() {
        let scorer = ImpactScorer::default();
        let snap = snapshot(80.0, vec![0.2, -0.1], choppy_closes());
        let record = scorer.score("TEST", None, &snap);

        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.sentiment_score, 0.0);
        assert!(record.is_degraded());
        assert!(record.expected_move_pct >= 0.0);
    }

    #[test]
    fn test_sentiment_raises_expected_move() {
        let scorer = ImpactScorer::default();
        let snap = snapshot(50.0, vec![0.1, 0.2], choppy_closes());

        let calm = scorer.score("TEST", Some(&ExternalSentiment::new(0.0, "flat")), &snap);
        let hot = scorer.score("TEST", Some(&ExternalSentiment::new(-0.9, "probe")), &snap);

        assert!(calm.expected_move_pct > 0.0);
        assert!(hot.expected_move_pct > calm.expected_move_pct);
        assert!(hot.confidence > calm.confidence);
        assert!((hot.sentiment_score + 0.9).abs() < 1e-12);
        assert!(!hot.is_degraded());
    }

    #[test]
    fn test_out_of_range_sentiment_clamped() {
        let scorer = ImpactScorer::default();
        let snap = snapshot(50.0, vec![0.1, 0.2], choppy_closes());
        let record = scorer.score("TEST", Some(&ExternalSentiment::new(3.0, "??")), &snap);

        assert_eq!(record.sentiment_score, 1.0);
        assert!(record.confidence <= 1.0);
    }

    #[test]
    fn test_flat_prices_no_expected_move() {
        let scorer = ImpactScorer::default();
        let snap = snapshot(50.0, vec![0.0, 0.0], vec![100.0; 5]);
        let record = scorer.score("TEST", Some(&ExternalSentiment::new(0.7, "beat")), &snap);
        assert_eq!(record.expected_move_pct, 0.0);
    }
}
