//! Moving average indicators.

use newsflow_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N values. The first N-1 outputs average
/// whatever history exists, so the output is as long as the input.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period. A period of zero is
    /// treated as one.
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        (0..data.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.period);
                let window = &data[start..=i];
                window.iter().sum::<f64>() / window.len() as f64
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Smoothing factor `2 / (span + 1)`, seeded with the first value and no
/// warm-up bias correction.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    alpha: f64,
}

impl Ema {
    /// Create a new EMA with the specified span. A span of zero is treated
    /// as one.
    pub fn new(span: usize) -> Self {
        let span = span.max(1);
        let alpha = 2.0 / (span as f64 + 1.0);
        Self { span, alpha }
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let Some(&first) = data.first() else {
            return vec![];
        };

        let mut result = Vec::with_capacity(data.len());
        let mut ema = first;
        result.push(ema);

        // ema + alpha * (x - ema) leaves a constant input exactly unchanged
        for &price in &data[1..] {
            ema += self.alpha * (price - ema);
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.span
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
