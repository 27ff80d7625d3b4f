//! Requested fetch window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// The span of history a price provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timeframe: Timeframe,
}

impl FetchWindow {
    /// Create a window from explicit bounds, swapping them if reversed.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, timeframe: Timeframe) -> Self {
        if start <= end {
            Self { start, end, timeframe }
        } else {
            Self {
                start: end,
                end: start,
                timeframe,
            }
        }
    }

    /// The `days` calendar days ending at `end`.
    pub fn lookback(end: DateTime<Utc>, days: u32, timeframe: Timeframe) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
            timeframe,
        }
    }

    /// Whether a millisecond timestamp falls inside the window (inclusive).
    pub fn contains_millis(&self, timestamp: i64) -> bool {
        timestamp >= self.start.timestamp_millis() && timestamp <= self.end.timestamp_millis()
    }
}
