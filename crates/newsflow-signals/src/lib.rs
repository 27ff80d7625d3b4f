//! Trading signal generation.
//!
//! [`SignalGenerator`] maps an impact record and its indicator snapshot to a
//! [`TradingSignal`](newsflow_core::types::TradingSignal) with entry band,
//! stop-loss and target sized by [`LevelPolicy`].

mod generator;
mod levels;

pub use generator::{AnalyzedTicker, SignalConfig, SignalGenerator};
pub use levels::{LevelPolicy, PriceLevels};
