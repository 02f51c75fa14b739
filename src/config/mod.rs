//! Configuration loading.
//!
//! Settings come from an optional TOML file whose path is passed in
//! explicitly, then from `POPSUB_*` environment variables
//! (`POPSUB_SUBSCRIBER_PORT=5557`), then from defaults.

mod settings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{
    BroadcasterSettings, ConnectionSettings, DEFAULT_PORT, DEFAULT_TOPIC, LoggingSettings,
    Settings,
};

/// Loads the configuration from `path` (when given) and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the broadcaster, subscriber and logging configurations
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    builder = builder.add_source(
        Environment::with_prefix("POPSUB")
            .separator("_")
            .try_parsing(true),
    );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        broadcaster: BroadcasterSettings {
            port: partial
                .broadcaster
                .as_ref()
                .and_then(|b| b.port)
                .unwrap_or(default.broadcaster.port),
            topic: partial
                .broadcaster
                .as_ref()
                .and_then(|b| b.topic.clone())
                .unwrap_or(default.broadcaster.topic),
        },
        subscriber: ConnectionSettings {
            address: partial
                .subscriber
                .as_ref()
                .and_then(|s| s.address.clone())
                .unwrap_or(default.subscriber.address),
            port: partial
                .subscriber
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.subscriber.port),
            topic: partial
                .subscriber
                .as_ref()
                .and_then(|s| s.topic.clone())
                .unwrap_or(default.subscriber.topic),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}

#[cfg(test)]
mod tests;
