//! Indicator snapshot produced by the analysis stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a MACD histogram sign change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramCross {
    /// Histogram moved from <= 0 to > 0
    Bullish,
    /// Histogram moved from >= 0 to < 0
    Bearish,
}

/// The trailing window of every indicator for one ticker.
///
/// Each vector holds the most recent periods (oldest first) and all vectors
/// share the same length and alignment with the tail of the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ticker: String,
    /// Timestamp of the last bar in the series
    pub as_of: DateTime<Utc>,
    /// Gap-filled closes
    pub close: Vec<f64>,
    pub sma20: Vec<f64>,
    pub sma50: Vec<f64>,
    pub rsi14: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_histogram: Vec<f64>,
}

impl IndicatorSnapshot {
    /// Number of periods in the window.
    pub fn window_len(&self) -> usize {
        self.close.len()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.close.last().copied()
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi14.last().copied()
    }

    pub fn latest_sma20(&self) -> Option<f64> {
        self.sma20.last().copied()
    }

    pub fn latest_sma50(&self) -> Option<f64> {
        self.sma50.last().copied()
    }

    pub fn latest_macd(&self) -> Option<f64> {
        self.macd.last().copied()
    }

    pub fn latest_histogram(&self) -> Option<f64> {
        self.macd_histogram.last().copied()
    }

    /// Histogram value one period before the latest.
    pub fn previous_histogram(&self) -> Option<f64> {
        let len = self.macd_histogram.len();
        if len < 2 {
            return None;
        }
        self.macd_histogram.get(len - 2).copied()
    }

    /// Sign change of the histogram between the previous and latest period.
    pub fn histogram_cross(&self) -> Option<HistogramCross> {
        let prev = self.previous_histogram()?;
        let last = self.latest_histogram()?;

        if prev <= 0.0 && last > 0.0 {
            Some(HistogramCross::Bullish)
        } else if prev >= 0.0 && last < 0.0 {
            Some(HistogramCross::Bearish)
        } else {
            None
        }
    }
}
