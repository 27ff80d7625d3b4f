//! News impact record produced by the scoring stage.

use serde::{Deserialize, Serialize};

/// Per-ticker combination of external sentiment and technical state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsImpactRecord {
    pub ticker: String,
    /// External sentiment in [-1, 1]; 0 when unavailable
    pub sentiment_score: f64,
    /// Urgency in [1, 5]
    pub technical_urgency: f64,
    /// Expected absolute move in percent, never negative
    pub expected_move_pct: f64,
    /// Confidence in [0, 1]; 0 when scoring was degraded
    pub confidence: f64,
    /// Why scoring ran without sentiment, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl NewsImpactRecord {
    /// Whether the record was scored without sentiment input.
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}
