//! Core traits for the signal pipeline.

mod indicator;
mod provider;

pub use indicator::{Indicator, MultiOutputIndicator};
pub use provider::{PriceSeriesProvider, SentimentProvider};
