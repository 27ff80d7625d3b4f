//! Error types for the signal pipeline.

use thiserror::Error;

/// Price provider errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FetchError {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Connection(_) | FetchError::RateLimited { .. } | FetchError::Api(_)
        )
    }

    /// Whether the failure says the provider itself is unusable, as opposed
    /// to an answer about one symbol.
    pub fn is_provider_failure(&self) -> bool {
        self.is_transient() || matches!(self, FetchError::Configuration(_))
    }
}

/// Indicator calculation errors. These describe the shape of the data and are
/// never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("no closing price could be resolved")]
    MissingCloseField,
}

/// Price level construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("{field} {value} cannot be represented as a price")]
    Unrepresentable { field: &'static str, value: f64 },

    #[error("price levels overflow the decimal range")]
    Overflow,
}

/// Sentiment provider errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    #[error("Sentiment source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid sentiment record: {0}")]
    Invalid(String),
}

/// Run-level failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Run timed out after {elapsed_ms} ms with {completed} of {total} tickers complete")]
    Timeout {
        elapsed_ms: u64,
        completed: usize,
        total: usize,
    },

    #[error("Price provider unavailable: none of {attempted} tickers could be fetched")]
    ProviderUnavailable { attempted: usize },

    #[error("No tickers requested")]
    NoTickers,

    #[error("Output error: {0}")]
    Output(String),
}
