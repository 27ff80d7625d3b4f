//! Validate configuration command.

use anyhow::Result;
use newsflow_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Price source: {:?}", config.data.source);
    println!(
        "Sentiment file: {}",
        config
            .sentiment
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("Max concurrent fetches: {}", config.pipeline.max_concurrent_fetches);
    println!(
        "Run timeout: {}",
        config
            .pipeline
            .timeout_secs
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "none".to_string())
    );
    println!("Fetch attempts: {}", config.pipeline.retry.max_attempts);
    println!("Output: {}", config.pipeline.output_path.display());
    println!("Signal horizon: {}", config.signals.horizon);

    Ok(())
}
