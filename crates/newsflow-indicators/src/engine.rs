//! Indicator engine: price series in, indicator snapshot out.

use newsflow_core::error::IndicatorError;
use newsflow_core::traits::{Indicator, MultiOutputIndicator};
use newsflow_core::types::{IndicatorSnapshot, PriceSeries};
use serde::{Deserialize, Serialize};

use crate::momentum::{Macd, Rsi};
use crate::moving_average::Sma;

/// Indicator periods and output window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Number of trailing periods kept in the snapshot
    pub window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            window: 10,
        }
    }
}

/// Forward-fill then back-fill missing or non-finite closes.
///
/// Returns `None` when no close in the input is usable.
pub fn fill_closes(raw: &[Option<f64>]) -> Option<Vec<f64>> {
    let first_valid = raw.iter().flatten().copied().find(|c| c.is_finite())?;

    let mut last = first_valid;
    let filled = raw
        .iter()
        .map(|close| {
            if let Some(c) = close.filter(|c| c.is_finite()) {
                last = c;
            }
            last
        })
        .collect();

    Some(filled)
}

/// Stateless calculator for the full indicator set.
///
/// `compute` is a pure function of the series: no caching, no interior
/// state, so repeated calls give bit-identical snapshots.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma_fast: Sma,
    sma_slow: Sma,
    rsi: Rsi,
    macd: Macd,
    window: usize,
}

impl IndicatorEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            sma_fast: Sma::new(config.sma_fast),
            sma_slow: Sma::new(config.sma_slow),
            rsi: Rsi::new(config.rsi_period),
            macd: Macd::with_periods(config.macd_fast, config.macd_slow, config.macd_signal),
            window: config.window.max(1),
        }
    }

    /// Compute the snapshot for `series`.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, IndicatorError> {
        let last_bar = series.last().ok_or(IndicatorError::EmptySeries)?;
        let closes = fill_closes(&series.closes()).ok_or(IndicatorError::MissingCloseField)?;

        let sma_fast = self.sma_fast.calculate(&closes);
        let sma_slow = self.sma_slow.calculate(&closes);
        let rsi = self.rsi.calculate(&closes);
        let macd = self.macd.calculate(&closes);

        let tail = |values: &[f64]| -> Vec<f64> {
            let start = values.len().saturating_sub(self.window);
            values[start..].to_vec()
        };
        let macd_line: Vec<f64> = macd.iter().map(|m| m.macd).collect();
        let macd_signal: Vec<f64> = macd.iter().map(|m| m.signal).collect();
        let macd_histogram: Vec<f64> = macd.iter().map(|m| m.histogram).collect();

        Ok(IndicatorSnapshot {
            ticker: series.ticker.clone(),
            as_of: last_bar.datetime(),
            close: tail(&closes),
            sma20: tail(&sma_fast),
            sma50: tail(&sma_slow),
            rsi14: tail(&rsi),
            macd: tail(&macd_line),
            macd_signal: tail(&macd_signal),
            macd_histogram: tail(&macd_histogram),
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsflow_core::types::{Bar, Timeframe};

    const DAY_MS: i64 = 86_400_000;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * DAY_MS, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect();
        PriceSeries::from_bars("TEST", Timeframe::Daily, bars)
    }

    fn wavy_closes(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 8.0 + (i as f64 * 0.13).cos() * 3.0)
            .collect()
    }

    #[test]
    fn test_fill_closes() {
        let filled = fill_closes(&[None, Some(2.0), None, Some(f64::NAN), Some(5.0), None]).unwrap();
        assert_eq!(filled, vec![2.0, 2.0, 2.0, 2.0, 5.0, 5.0]);

        assert!(fill_closes(&[None, None]).is_none());
        assert!(fill_closes(&[Some(f64::NAN)]).is_none());
    }

    #[test]
    fn test_empty_series() {
        let engine = IndicatorEngine::default();
        let series = PriceSeries::new("EMPTY", Timeframe::Daily);
        assert_eq!(engine.compute(&series), Err(IndicatorError::EmptySeries));
    }

    #[test]
    fn test_missing_close_field() {
        let engine = IndicatorEngine::default();
        let bars = vec![
            Bar::without_close(0, 1.0, 1.0, 1.0, 10.0),
            Bar::without_close(DAY_MS, 1.0, 1.0, 1.0, 10.0),
        ];
        let series = PriceSeries::from_bars("GAPS", Timeframe::Daily, bars);
        assert_eq!(engine.compute(&series), Err(IndicatorError::MissingCloseField));
    }

    #[test]
    fn test_flat_five_bars() {
        let engine = IndicatorEngine::default();
        let snapshot = engine.compute(&series_from_closes(&[100.0; 5])).unwrap();

        assert_eq!(snapshot.window_len(), 5);
        assert_eq!(snapshot.latest_sma20(), Some(100.0));
        assert_eq!(snapshot.latest_sma50(), Some(100.0));
        assert_eq!(snapshot.latest_rsi(), Some(50.0));
        assert_eq!(snapshot.latest_macd(), Some(0.0));
        assert_eq!(snapshot.latest_histogram(), Some(0.0));
    }

    #[test]
    fn test_window_is_last_ten() {
        let engine = IndicatorEngine::default();
        let closes = wavy_closes(40);
        let snapshot = engine.compute(&series_from_closes(&closes)).unwrap();

        assert_eq!(snapshot.window_len(), 10);
        assert_eq!(snapshot.rsi14.len(), 10);
        assert_eq!(snapshot.macd_histogram.len(), 10);
        assert_eq!(snapshot.close, closes[30..].to_vec());
        assert_eq!(snapshot.as_of.timestamp_millis(), 39 * DAY_MS);
    }

    #[test]
    fn test_bounds() {
        let engine = IndicatorEngine::default();
        for len in [1usize, 2, 7, 26, 60] {
            let closes = wavy_closes(len);
            let min = closes.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let snapshot = engine.compute(&series_from_closes(&closes)).unwrap();

            for v in snapshot.sma20.iter().chain(snapshot.sma50.iter()) {
                assert!(*v >= min - 1e-9 && *v <= max + 1e-9);
            }
            for v in &snapshot.rsi14 {
                assert!(*v >= 0.0 && *v <= 100.0);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = IndicatorEngine::default();
        let series = series_from_closes(&wavy_closes(55));

        let first = engine.compute(&series).unwrap();
        let second = engine.compute(&series).unwrap();
        assert_eq!(first, second);

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first.macd_histogram), bits(&second.macd_histogram));
    }

    #[test]
    fn test_gap_filled_before_indicators() {
        let engine = IndicatorEngine::default();
        let bars = vec![
            Bar::without_close(0, 1.0, 1.0, 1.0, 10.0),
            Bar::new(DAY_MS, 10.0, 10.0, 10.0, 10.0, 10.0),
            Bar::without_close(2 * DAY_MS, 1.0, 1.0, 1.0, 10.0),
            Bar::new(3 * DAY_MS, 12.0, 12.0, 12.0, 12.0, 10.0),
        ];
        let snapshot = engine
            .compute(&PriceSeries::from_bars("GAPS", Timeframe::Daily, bars))
            .unwrap();

        assert_eq!(snapshot.close, vec![10.0, 10.0, 10.0, 12.0]);
        assert!(snapshot.macd.iter().all(|v| v.is_finite()));
        assert!(snapshot.rsi14.iter().all(|v| v.is_finite()));
    }
}
