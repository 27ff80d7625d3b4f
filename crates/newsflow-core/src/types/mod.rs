//! Core data types for the signal pipeline.

mod bar;
mod impact;
mod sentiment;
mod signal;
mod snapshot;
mod timeframe;
mod window;

pub use bar::{Bar, PriceSeries};
pub use impact::NewsImpactRecord;
pub use sentiment::ExternalSentiment;
pub use signal::{Direction, PriceRange, SignalOutcome, SkippedTicker, TradingSignal};
pub use snapshot::{HistogramCross, IndicatorSnapshot};
pub use timeframe::Timeframe;
pub use window::FetchWindow;
