//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, LoggingConfig, PriceSource, SentimentSettings,
    ValidationError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix for overrides, e.g. `NEWSFLOW__PIPELINE__TIMEOUT_SECS=30`.
pub const ENV_PREFIX: &str = "NEWSFLOW";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
