//! Price levels for a signal: entry band, stop-loss, target and risk.

use newsflow_core::error::SignalError;
use newsflow_core::types::{Direction, PriceRange};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Sizing of price levels relative to the expected move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPolicy {
    /// Smallest move (percent) used for offsets, so a flat ticker still
    /// gets a stop away from entry
    pub min_move_pct: f64,
    /// Stop distance as a fraction of the target distance
    pub stop_ratio: f64,
    /// Half-width of the entry band as a fraction of the target distance
    pub entry_band_ratio: f64,
    /// Decimal places for every emitted price
    pub price_decimals: u32,
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self {
            min_move_pct: 0.5,
            stop_ratio: 0.5,
            entry_band_ratio: 0.25,
            price_decimals: 2,
        }
    }
}

/// Computed levels for one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevels {
    pub entry: Decimal,
    pub entry_range: PriceRange,
    pub stop_loss: Decimal,
    pub price_target: Decimal,
    pub max_risk: Decimal,
}

impl LevelPolicy {
    /// Move used for offsets, in percent.
    pub fn effective_move_pct(&self, expected_move_pct: f64) -> f64 {
        let expected = if expected_move_pct.is_finite() {
            expected_move_pct
        } else {
            0.0
        };
        expected.max(self.min_move_pct).max(0.0)
    }

    /// Levels around `close` for `direction`.
    ///
    /// Long setups put the target above and the stop below entry, short
    /// setups the reverse. A hold is laid out like a long so the stop still
    /// bounds the downside of an existing position. Inputs outside the
    /// decimal range are rejected rather than clamped.
    pub fn levels(
        &self,
        close: f64,
        expected_move_pct: f64,
        direction: Direction,
    ) -> Result<PriceLevels, SignalError> {
        let dp = self.price_decimals;
        let entry = to_decimal("close", close)?.round_dp(dp);
        let move_frac =
            to_decimal("expected move", self.effective_move_pct(expected_move_pct))? / dec!(100);
        let stop_ratio = to_decimal("stop ratio", self.stop_ratio.max(0.0))?;
        let band_ratio = to_decimal("entry band ratio", self.entry_band_ratio.max(0.0))?;

        let stop_frac = move_frac
            .checked_mul(stop_ratio)
            .ok_or(SignalError::Overflow)?;
        let band = entry
            .checked_mul(move_frac)
            .and_then(|v| v.checked_mul(band_ratio))
            .ok_or(SignalError::Overflow)?;

        let above = |frac: Decimal| {
            Decimal::ONE
                .checked_add(frac)
                .and_then(|f| entry.checked_mul(f))
        };
        let below = |frac: Decimal| {
            Decimal::ONE
                .checked_sub(frac)
                .and_then(|f| entry.checked_mul(f))
        };
        let (price_target, stop_loss) = match direction {
            Direction::Buy => (above(move_frac), below(stop_frac)),
            Direction::Sell => (below(move_frac), above(stop_frac)),
            Direction::Hold => (Some(entry), below(stop_frac)),
        };
        let price_target = price_target.ok_or(SignalError::Overflow)?.round_dp(dp);
        let stop_loss = stop_loss.ok_or(SignalError::Overflow)?.round_dp(dp);

        let low = entry.checked_sub(band).ok_or(SignalError::Overflow)?;
        let high = entry.checked_add(band).ok_or(SignalError::Overflow)?;
        let max_risk = entry
            .checked_sub(stop_loss)
            .ok_or(SignalError::Overflow)?
            .abs();

        Ok(PriceLevels {
            entry,
            entry_range: PriceRange {
                low: low.round_dp(dp),
                high: high.round_dp(dp),
            },
            stop_loss,
            price_target,
            max_risk,
        })
    }
}

fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, SignalError> {
    Decimal::from_f64(value).ok_or(SignalError::Unrepresentable { field, value })
}
