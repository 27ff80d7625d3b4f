//! Per-ticker pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a single ticker's pipeline. Transitions only move forward:
/// `Fetch -> Analyze -> Predict -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Analyze,
    Predict,
    Done,
}

impl Stage {
    /// The following stage; `Done` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Stage::Fetch => Stage::Analyze,
            Stage::Analyze => Stage::Predict,
            Stage::Predict | Stage::Done => Stage::Done,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Done
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetch => "fetch",
            Stage::Analyze => "analyze",
            Stage::Predict => "predict",
            Stage::Done => "done",
        };
        write!(f, "{}", s)
    }
}
