//! Coordinator configuration.

use newsflow_core::types::Timeframe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on tickers processed at once
    pub max_concurrent_fetches: usize,
    /// Run-level deadline in seconds; `None` waits for every ticker
    pub timeout_secs: Option<u64>,
    /// Calendar days of history requested per ticker
    pub lookback_days: u32,
    pub timeframe: Timeframe,
    pub output_path: PathBuf,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
            timeout_secs: Some(120),
            lookback_days: 120,
            timeframe: Timeframe::Daily,
            output_path: PathBuf::from("predictions.json"),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_fetches == 0 {
            return Err("max_concurrent_fetches must be at least 1".to_string());
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be positive when set".to_string());
        }
        if self.lookback_days == 0 {
            return Err("lookback_days must be at least 1".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.output_path.as_os_str().is_empty() {
            return Err("output_path must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.output_path, PathBuf::from("predictions.json"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = PipelineConfig {
            max_concurrent_fetches: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
