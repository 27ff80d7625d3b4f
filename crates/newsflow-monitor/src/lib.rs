//! Observability for pipeline runs: tracing subscriber setup and the
//! end-of-run summary report.

mod logging;
mod summary;

pub use logging::setup_logging;
pub use summary::RunSummary;
