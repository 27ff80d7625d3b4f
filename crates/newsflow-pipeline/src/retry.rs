//! Bounded retry with exponential backoff for price fetches.

use newsflow_core::error::FetchError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry settings. Only transient fetch errors are retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Delay after `err`, honouring a server-provided retry-after.
    fn delay_after(&self, err: &FetchError, retry: u32) -> Duration {
        let backoff = self.backoff(retry);
        match err {
            FetchError::RateLimited { retry_after_secs } => {
                backoff.max(Duration::from_secs(*retry_after_secs))
            }
            _ => backoff,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Returns the final result and the number of attempts made.
    pub async fn run<T, F, Fut>(&self, ticker: &str, mut op: F) -> (Result<T, FetchError>, u32)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return (Ok(value), attempt),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.delay_after(&err, attempt - 1);
                    warn!(
                        ticker,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return (Err(err), attempt),
            }
        }
    }
}
