//! Prediction file output.

use newsflow_core::error::PipelineError;
use newsflow_core::types::SignalOutcome;
use std::path::Path;
use tracing::info;

/// Serialize outcomes as a JSON array.
pub fn to_json(outcomes: &[SignalOutcome]) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(outcomes).map_err(|e| PipelineError::Output(e.to_string()))
}

/// Write outcomes to `path`, creating parent directories.
pub async fn write_predictions(
    path: &Path,
    outcomes: &[SignalOutcome],
) -> Result<(), PipelineError> {
    let json = to_json(outcomes)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PipelineError::Output(format!("{}: {}", parent.display(), e)))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| PipelineError::Output(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), records = outcomes.len(), "Wrote predictions");
    Ok(())
}
