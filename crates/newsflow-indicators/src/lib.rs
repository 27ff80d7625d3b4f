//! Technical indicators for the analysis stage.
//!
//! - Moving averages (SMA with a minimum period of one, first-value-seeded EMA)
//! - Momentum indicators (RSI over rolling means, MACD)
//! - Realized volatility of simple returns
//! - [`IndicatorEngine`], which turns a price series into an indicator snapshot

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use engine::{fill_closes, EngineConfig, IndicatorEngine};
pub use momentum::{Macd, MacdOutput, Rsi, RSI_EPSILON, RSI_NEUTRAL};
pub use moving_average::{Ema, Sma};
pub use volatility::{realized_volatility_pct, simple_returns};
