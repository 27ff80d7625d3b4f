//! Realized volatility over a close window.

use statrs::statistics::Statistics;

/// Simple returns between consecutive closes. Pairs whose earlier close is
/// zero are skipped.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Population standard deviation of simple returns, in percent.
///
/// Returns 0 when fewer than two closes are available.
pub fn realized_volatility_pct(closes: &[f64]) -> f64 {
    let returns = simple_returns(closes);
    if returns.is_empty() {
        return 0.0;
    }

    let std_dev = returns.iter().population_std_dev();
    if std_dev.is_finite() {
        std_dev * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_constant_returns_is_zero() {
        // Equal percentage steps have zero dispersion
        let closes = [100.0, 110.0, 121.0, 133.1];
        assert!(realized_volatility_pct(&closes) < 1e-9);
    }

    #[test]
    fn test_volatility_alternating() {
        // returns +10%, -10% -> population std dev = 10%
        let closes = [100.0, 110.0, 99.0];
        assert!((realized_volatility_pct(&closes) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_volatility_short_input() {
        assert_eq!(realized_volatility_pct(&[]), 0.0);
        assert_eq!(realized_volatility_pct(&[100.0]), 0.0);
    }
}
