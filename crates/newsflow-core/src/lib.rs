//! Core types and traits for the news signal pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, FetchWindow)
//! - Stage artifacts (IndicatorSnapshot, NewsImpactRecord, TradingSignal)
//! - Collaborator traits for price and sentiment providers
//! - The error taxonomy shared by every stage

pub mod error;
pub mod market;
pub mod traits;
pub mod types;

pub use error::{FetchError, IndicatorError, PipelineError, SentimentError, SignalError};
pub use market::is_us_market_open;
pub use traits::*;
pub use types::*;
