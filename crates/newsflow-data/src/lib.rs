//! Price and sentiment providers.
//!
//! Price sources implement [`PriceSeriesProvider`](newsflow_core::traits::PriceSeriesProvider):
//! a directory of CSV files, an in-memory map, and the Alpaca data API.
//! Sentiment sources implement [`SentimentProvider`](newsflow_core::traits::SentimentProvider).

mod alpaca;
mod csv_source;
mod memory;
mod sentiment;

pub use alpaca::{AlpacaConfig, AlpacaPriceProvider};
pub use csv_source::CsvPriceProvider;
pub use memory::InMemoryPriceProvider;
pub use sentiment::{JsonSentimentProvider, StaticSentimentProvider};
