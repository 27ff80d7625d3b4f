//! Alpaca market-data bars provider.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use newsflow_core::error::FetchError;
use newsflow_core::traits::PriceSeriesProvider;
use newsflow_core::types::{Bar, FetchWindow, PriceSeries};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Alpaca data API settings. Credentials are read from the named
/// environment variables when the provider is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaConfig {
    pub key_env: String,
    pub secret_env: String,
    pub data_url: String,
    /// "iex" for the free feed, "sip" for the consolidated one
    pub feed: String,
    /// Page size requested per call
    pub page_limit: usize,
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        Self {
            key_env: "ALPACA_API_KEY".to_string(),
            secret_env: "ALPACA_API_SECRET".to_string(),
            data_url: "https://data.alpaca.markets".to_string(),
            feed: "iex".to_string(),
            page_limit: 10_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: Option<f64>,
    #[serde(default)]
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
    next_page_token: Option<String>,
}

/// Historical bars from the Alpaca data API.
pub struct AlpacaPriceProvider {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaPriceProvider {
    /// Build the client, reading credentials from the configured env vars.
    pub fn new(config: AlpacaConfig) -> Result<Self, FetchError> {
        let api_key = std::env::var(&config.key_env)
            .map_err(|_| FetchError::Configuration(format!("{} not set", config.key_env)))?;
        let api_secret = std::env::var(&config.secret_env)
            .map_err(|_| FetchError::Configuration(format!("{} not set", config.secret_env)))?;
        Self::with_credentials(config, &api_key, &api_secret)
    }

    /// Build the client with explicit credentials.
    pub fn with_credentials(
        config: AlpacaConfig,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key)
                .map_err(|e| FetchError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(api_secret)
                .map_err(|e| FetchError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn bars_url(&self, ticker: &str) -> String {
        format!(
            "{}/v2/stocks/{}/bars",
            self.config.data_url.trim_end_matches('/'),
            ticker
        )
    }

    async fn fetch_page(
        &self,
        ticker: &str,
        window: &FetchWindow,
        page_token: Option<&str>,
    ) -> Result<AlpacaBarsResponse, FetchError> {
        let mut params = vec![
            ("timeframe", window.timeframe.as_alpaca_str().to_string()),
            ("start", window.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end", window.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("feed", self.config.feed.clone()),
            ("limit", self.config.page_limit.to_string()),
            ("adjustment", "raw".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("page_token", token.to_string()));
        }

        let resp = self
            .client
            .get(self.bars_url(ticker))
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(ticker, status, retry_after, &text));
        }

        resp.json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Map a non-success response to the fetch error taxonomy.
fn status_error(ticker: &str, status: StatusCode, retry_after: Option<u64>, body: &str) -> FetchError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            FetchError::SymbolNotFound(ticker.to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(1),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Configuration(format!("{}: {}", status, body))
        }
        _ => FetchError::Api(format!("{}: {}", status, body)),
    }
}

fn convert_bar(bar: &AlpacaBar) -> Result<Bar, FetchError> {
    let ts = DateTime::parse_from_rfc3339(&bar.t)
        .map_err(|e| FetchError::Parse(format!("bad bar timestamp {}: {}", bar.t, e)))?
        .timestamp_millis();
    Ok(Bar {
        timestamp: ts,
        open: bar.o,
        high: bar.h,
        low: bar.l,
        close: bar.c,
        volume: bar.v,
    })
}

#[async_trait]
impl PriceSeriesProvider for AlpacaPriceProvider {
    async fn fetch(&self, ticker: &str, window: &FetchWindow) -> Result<PriceSeries, FetchError> {
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(ticker, window, page_token.as_deref()).await?;
            for bar in page.bars.iter().flatten() {
                match convert_bar(bar) {
                    Ok(bar) => bars.push(bar),
                    Err(e) => warn!(ticker, error = %e, "Dropping malformed bar"),
                }
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(ticker, bars = bars.len(), "Fetched Alpaca bars");
        Ok(PriceSeries::from_bars(ticker, window.timeframe, bars))
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}
