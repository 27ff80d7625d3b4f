//! Configuration structures.

use newsflow_data::AlpacaConfig;
use newsflow_impact::ImpactWeights;
use newsflow_indicators::EngineConfig;
use newsflow_pipeline::PipelineConfig;
use newsflow_signals::SignalConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Inconsistent configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid [{section}] settings: {message}")]
pub struct ValidationError {
    pub section: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(section: &'static str, message: impl Into<String>) -> Self {
        Self {
            section,
            message: message.into(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub sentiment: SentimentSettings,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub indicators: EngineConfig,
    #[serde(default)]
    pub impact: ImpactWeights,
    #[serde(default)]
    pub signals: SignalConfig,
}

impl AppConfig {
    /// Check cross-field consistency. Loading only checks shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.pipeline
            .validate()
            .map_err(|m| ValidationError::new("pipeline", m))?;
        self.signals
            .validate()
            .map_err(|m| ValidationError::new("signals", m))?;

        let ind = &self.indicators;
        if ind.window == 0 {
            return Err(ValidationError::new("indicators", "window must be at least 1"));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(ValidationError::new(
                "indicators",
                "macd_fast must be shorter than macd_slow",
            ));
        }

        let impact = &self.impact;
        if impact.oversold >= impact.overbought {
            return Err(ValidationError::new(
                "impact",
                "oversold must be below overbought",
            ));
        }
        if impact.rsi_weight < 0.0 || impact.cross_weight < 0.0 || impact.sentiment_move_weight < 0.0
        {
            return Err(ValidationError::new("impact", "weights must be non-negative"));
        }

        if self.data.source == PriceSource::Csv && self.data.csv_dir.as_os_str().is_empty() {
            return Err(ValidationError::new("data", "csv_dir is required for the csv source"));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "newsflow".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.format.to_ascii_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ValidationError::new(
                "logging",
                format!("unknown format '{}', expected pretty or json", other),
            )),
        }
    }
}

/// Where historical bars come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[default]
    Csv,
    Alpaca,
}

/// Price data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: PriceSource,
    /// Directory of `{TICKER}.csv` files
    pub csv_dir: PathBuf,
    pub alpaca: AlpacaConfig,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: PriceSource::Csv,
            csv_dir: PathBuf::from("data"),
            alpaca: AlpacaConfig::default(),
        }
    }
}

/// Sentiment input settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentimentSettings {
    /// JSON file keyed by ticker; absent means every ticker is scored
    /// without sentiment
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.source, PriceSource::Csv);
        assert_eq!(config.signals.horizon, "2h");
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = toml::to_string(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.pipeline, PipelineConfig::default());
        assert_eq!(parsed.impact, ImpactWeights::default());
    }

    #[test]
    fn test_bad_logging_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.section, "logging");
    }

    #[test]
    fn test_inverted_macd_rejected() {
        let mut config = AppConfig::default();
        config.indicators.macd_fast = 30;
        assert_eq!(config.validate().unwrap_err().section, "indicators");
    }

    #[test]
    fn test_alpaca_source_parses() {
        let config: AppConfig = toml::from_str(
            r#"
[data]
source = "alpaca"

[data.alpaca]
feed = "sip"
"#,
        )
        .unwrap();
        assert_eq!(config.data.source, PriceSource::Alpaca);
        assert_eq!(config.data.alpaca.feed, "sip");
        assert_eq!(config.data.alpaca.key_env, "ALPACA_API_KEY");
    }
}
