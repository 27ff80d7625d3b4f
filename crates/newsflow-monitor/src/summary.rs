//! End-of-run summary.

use newsflow_core::types::{Direction, SignalOutcome};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Signal row in the summary table.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub ticker: String,
    pub direction: Direction,
    pub confidence: f64,
    pub entry_low: String,
    pub entry_high: String,
    pub price_target: String,
    pub stop_loss: String,
}

/// Counts and per-signal rows for one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub market_open: bool,
    pub requested: usize,
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
    pub skipped: usize,
    pub cancelled: usize,
    pub mean_confidence: f64,
    pub rows: Vec<SummaryRow>,
    pub skipped_reasons: Vec<(String, String)>,
}

impl RunSummary {
    /// Tally the outcomes of a run. `cancelled` lists tickers dropped at the
    /// run deadline.
    pub fn new(
        run_id: Uuid,
        market_open: bool,
        outcomes: &[SignalOutcome],
        cancelled: &[String],
    ) -> Self {
        let mut summary = Self {
            run_id,
            market_open,
            requested: outcomes.len() + cancelled.len(),
            buy: 0,
            sell: 0,
            hold: 0,
            skipped: 0,
            cancelled: cancelled.len(),
            mean_confidence: 0.0,
            rows: Vec::new(),
            skipped_reasons: Vec::new(),
        };

        let mut confidence_sum = 0.0;
        for outcome in outcomes {
            match outcome {
                SignalOutcome::Signal(signal) => {
                    match signal.direction {
                        Direction::Buy => summary.buy += 1,
                        Direction::Sell => summary.sell += 1,
                        Direction::Hold => summary.hold += 1,
                    }
                    confidence_sum += signal.confidence;
                    summary.rows.push(SummaryRow {
                        ticker: signal.ticker.clone(),
                        direction: signal.direction,
                        confidence: signal.confidence,
                        entry_low: signal.entry_range.low.to_string(),
                        entry_high: signal.entry_range.high.to_string(),
                        price_target: signal.price_target.to_string(),
                        stop_loss: signal.stop_loss.to_string(),
                    });
                }
                SignalOutcome::Skipped(skipped) => {
                    summary.skipped += 1;
                    summary
                        .skipped_reasons
                        .push((skipped.ticker.clone(), skipped.reason.clone()));
                }
            }
        }

        let signals = summary.signal_count();
        if signals > 0 {
            summary.mean_confidence = confidence_sum / signals as f64;
        }
        summary
    }

    pub fn signal_count(&self) -> usize {
        self.buy + self.sell + self.hold
    }

    /// Text report for the terminal.
    pub fn render(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     SIGNAL RUN SUMMARY                     \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Run ID:              {}\n", self.run_id));
        s.push_str(&format!(
            "  Market Session:      {}\n",
            if self.market_open { "open" } else { "closed" }
        ));
        s.push_str(&format!("  Tickers Requested:   {}\n", self.requested));
        s.push('\n');

        s.push_str("OUTCOMES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Buy:                 {}\n", self.buy));
        s.push_str(&format!("  Sell:                {}\n", self.sell));
        s.push_str(&format!("  Hold:                {}\n", self.hold));
        s.push_str(&format!("  Skipped:             {}\n", self.skipped));
        s.push_str(&format!("  Cancelled:           {}\n", self.cancelled));
        s.push_str(&format!(
            "  Mean Confidence:     {:.2}\n",
            self.mean_confidence
        ));
        s.push('\n');

        if !self.rows.is_empty() {
            s.push_str("SIGNALS\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            s.push_str(&format!(
                "  {:<8} {:<5} {:>5}  {:>19}  {:>9}  {:>9}\n",
                "TICKER", "DIR", "CONF", "ENTRY", "TARGET", "STOP"
            ));
            for row in &self.rows {
                s.push_str(&format!(
                    "  {:<8} {:<5} {:>5.2}  {:>19}  {:>9}  {:>9}\n",
                    row.ticker,
                    row.direction.to_string(),
                    row.confidence,
                    format!("{}-{}", row.entry_low, row.entry_high),
                    row.price_target,
                    row.stop_loss
                ));
            }
            s.push('\n');
        }

        if !self.skipped_reasons.is_empty() {
            s.push_str("SKIPPED\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for (ticker, reason) in &self.skipped_reasons {
                s.push_str(&format!("  {:<8} {}\n", ticker, reason));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
