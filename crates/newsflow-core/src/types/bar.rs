//! OHLCV bar and price series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// OHLCV bar as delivered by a price provider.
///
/// The close is optional because upstream feeds occasionally drop it; the
/// indicator engine fills the gaps before computing anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price, if the feed reported one
    #[serde(default)]
    pub close: Option<f64>,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close: Some(close),
            volume,
        }
    }

    /// Create a bar whose close was not reported.
    pub fn without_close(timestamp: i64, open: f64, high: f64, low: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close: None,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Ordered bars for a single ticker.
///
/// Timestamps are strictly increasing; construction sorts the input and
/// keeps the last bar seen for any duplicated timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new(ticker: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            ticker: ticker.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Build a series from unordered bars.
    pub fn from_bars(ticker: impl Into<String>, timeframe: Timeframe, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps arrival order among equal timestamps, so the
        // reverse dedup below retains the most recent arrival.
        bars.sort_by_key(|b| b.timestamp);
        bars.reverse();
        bars.dedup_by_key(|b| b.timestamp);
        bars.reverse();

        Self {
            ticker: ticker.into(),
            timeframe,
            bars,
        }
    }

    /// Append a bar. Returns false (and drops the bar) if its timestamp does
    /// not advance the series.
    pub fn push(&mut self, bar: Bar) -> bool {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return false;
            }
        }
        self.bars.push(bar);
        true
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract raw close prices, gaps included.
    pub fn closes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bars_sorts_and_dedups() {
        let bars = vec![
            Bar::new(3, 1.0, 1.0, 1.0, 3.0, 10.0),
            Bar::new(1, 1.0, 1.0, 1.0, 1.0, 10.0),
            Bar::new(2, 1.0, 1.0, 1.0, 2.0, 10.0),
            Bar::new(2, 1.0, 1.0, 1.0, 2.5, 10.0),
        ];
        let series = PriceSeries::from_bars("AAPL", Timeframe::Daily, bars);

        assert_eq!(series.len(), 3);
        let timestamps: Vec<i64> = series.iter().map(|b| b.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
        // Later arrival wins for the duplicated timestamp
        assert_eq!(series.bars()[1].close, Some(2.5));
    }

    #[test]
    fn test_push_rejects_stale_bars() {
        let mut series = PriceSeries::new("AAPL", Timeframe::Daily);
        assert!(series.push(Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert!(!series.push(Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert!(!series.push(Bar::new(0, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert!(series.push(Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_closes_keep_gaps() {
        let mut series = PriceSeries::new("AAPL", Timeframe::Daily);
        series.push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Bar::without_close(2, 100.5, 102.0, 100.0, 2000.0));

        assert_eq!(series.closes(), vec![Some(100.5), None]);
    }

    #[test]
    fn test_bar_datetime() {
        let bar = Bar::new(1_705_312_800_000, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(bar.datetime().timestamp(), 1_705_312_800);
    }
}
