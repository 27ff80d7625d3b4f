//! Pipeline coordination.
//!
//! [`PipelineCoordinator`] fans a ticker list out to bounded concurrent
//! tasks, retries transient fetch failures, enforces the run deadline and
//! returns a [`SignalBatch`] in input order. [`write_predictions`] persists
//! the outcomes as a JSON array.

mod config;
mod coordinator;
mod retry;
mod stage;
mod writer;

pub use config::PipelineConfig;
pub use coordinator::{PipelineCoordinator, SignalBatch};
pub use retry::RetryPolicy;
pub use stage::Stage;
pub use writer::{to_json, write_predictions};
