//! Bar resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolution of the bars a provider returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    #[default]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
}

/// (variant, short label, Alpaca bar string)
const LABELS: [(Timeframe, &str, &str); 6] = [
    (Timeframe::Minute1, "1m", "1Min"),
    (Timeframe::Minute5, "5m", "5Min"),
    (Timeframe::Minute15, "15m", "15Min"),
    (Timeframe::Hour1, "1h", "1Hour"),
    (Timeframe::Daily, "1d", "1Day"),
    (Timeframe::Weekly, "1w", "1Week"),
];

impl Timeframe {
    fn labels(self) -> (&'static str, &'static str) {
        LABELS
            .iter()
            .find(|(tf, _, _)| *tf == self)
            .map(|(_, short, alpaca)| (*short, *alpaca))
            .unwrap_or(("1d", "1Day"))
    }

    /// Short label used in config files and on the command line.
    pub fn label(self) -> &'static str {
        self.labels().0
    }

    /// Bar timeframe string understood by the Alpaca market data API.
    pub fn as_alpaca_str(self) -> &'static str {
        self.labels().1
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the short label, the Alpaca string, or a plain word
/// (`daily`, `hourly`, `weekly`), case-insensitively.
impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let word = match wanted.as_str() {
            "daily" | "day" => Some(Timeframe::Daily),
            "hourly" | "hour" => Some(Timeframe::Hour1),
            "weekly" | "week" => Some(Timeframe::Weekly),
            _ => None,
        };
        word.or_else(|| {
            LABELS
                .iter()
                .find(|(_, short, alpaca)| {
                    *short == wanted || alpaca.eq_ignore_ascii_case(&wanted)
                })
                .map(|(tf, _, _)| *tf)
        })
        .ok_or_else(|| format!("unknown timeframe '{}', expected one of 1m, 5m, 15m, 1h, 1d, 1w", s))
    }
}
