//! Momentum indicators.

use newsflow_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::{Ema, Sma};

/// Guard added to the average loss so a window without losses stays finite.
pub const RSI_EPSILON: f64 = 1e-10;

/// RSI reported for a window with neither gains nor losses.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Relative Strength Index (RSI).
///
/// Average gain and loss are plain rolling means over `period` deltas with a
/// minimum period of one, not Wilder smoothing.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    /// Per-bar gains and losses. The first bar has no predecessor and counts
    /// as no change.
    fn gains_and_losses(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());

        for i in 0..data.len() {
            let change = if i == 0 { 0.0 } else { data[i] - data[i - 1] };
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        (gains, losses)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let (gains, losses) = Self::gains_and_losses(data);
        let mean = Sma::new(self.period);
        let avg_gains = mean.calculate(&gains);
        let avg_losses = mean.calculate(&losses);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if gain == 0.0 && loss == 0.0 {
                    RSI_NEUTRAL
                } else {
                    100.0 - 100.0 / (1.0 + gain / (loss + RSI_EPSILON))
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom spans.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let fast_ema = self.fast.calculate(data);
        let slow_ema = self.slow.calculate(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = self.signal.calculate(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow.period() + self.signal.period()
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
