//! CSV price provider.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use newsflow_core::error::FetchError;
use newsflow_core::traits::PriceSeriesProvider;
use newsflow_core::types::{Bar, FetchWindow, PriceSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: f64,
    #[serde(alias = "High", alias = "high", default)]
    high: f64,
    #[serde(alias = "Low", alias = "low", default)]
    low: f64,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Adj Close", alias = "adj_close", alias = "adj close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Reads `{TICKER}.csv` files from a directory.
///
/// Rows outside the requested window are dropped. A file with no rows in the
/// window yields an empty series, which the indicator engine rejects.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    /// Create a provider rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(FetchError::Configuration(format!(
                "data directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    /// Parse CSV content into bars, in file order.
    pub fn parse_bars(content: &[u8]) -> Result<Vec<Bar>, FetchError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| FetchError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;
            bars.push(Bar {
                timestamp,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close.or(record.adj_close),
                volume: record.volume,
            });
        }
        Ok(bars)
    }
}

#[async_trait]
impl PriceSeriesProvider for CsvPriceProvider {
    async fn fetch(&self, ticker: &str, window: &FetchWindow) -> Result<PriceSeries, FetchError> {
        let path = self.path_for(ticker);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::SymbolNotFound(ticker.to_string()));
            }
            Err(e) => return Err(FetchError::Connection(e.to_string())),
        };

        let bars: Vec<Bar> = Self::parse_bars(&content)?
            .into_iter()
            .filter(|bar| window.contains_millis(bar.timestamp))
            .collect();
        debug!(ticker, bars = bars.len(), path = %path.display(), "Loaded CSV bars");

        Ok(PriceSeries::from_bars(ticker, window.timeframe, bars))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse the timestamp formats found in exported price files.
fn parse_timestamp(date_str: &str) -> Result<i64, FetchError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(FetchError::Parse(format!("Could not parse date: {}", date_str)))
}
