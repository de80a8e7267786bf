//! Configuration management for tubefeed
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tubefeed::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Publishing to topic: {}", config.kafka.topic);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `TUBEFEED__<section>__<key>`
//!
//! Examples:
//! - `TUBEFEED__YOUTUBE__PLAYLIST_ID=PL123abc`
//! - `TUBEFEED__KAFKA__BOOTSTRAP_SERVERS=broker:9092`
//! - `TUBEFEED__SCHEMA_REGISTRY__URL=http://registry:8081`
//!
//! Secrets come only from the environment: `YOUTUBE_API_KEY`, and optionally
//! `SCHEMA_REGISTRY_USERNAME` / `SCHEMA_REGISTRY_PASSWORD`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/tubefeed.toml`.
//! This can be overridden using the `TUBEFEED_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, KafkaConfig, SchemaRegistryConfig, YoutubeConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`TUBEFEED__*`)
    /// 2. TOML file (default: `config/tubefeed.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation
    /// fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_override(None)
    }

    /// Load like [`Config::load`] but from an explicit file path, keeping the
    /// environment layering and secret loading.
    pub fn load_with_override(path: Option<std::path::PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[youtube]
playlist_id = "PL63F0C78739B09958"
api_base_url = "https://www.googleapis.com/youtube/v3"
request_timeout_secs = 20

[kafka]
bootstrap_servers = "kafka-1:9092"
topic = "youtubeVideos"
queue_capacity = 128
flush_timeout_secs = 60

[kafka.properties]
"enable.idempotence" = "true"

[schema_registry]
url = "https://registry.internal:8081"
subject = "youtubeVideos-value"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.youtube.playlist_id, "PL63F0C78739B09958");
        assert_eq!(config.youtube.request_timeout_secs, 20);
        assert_eq!(config.kafka.queue_capacity, 128);
        assert_eq!(config.kafka.flush_timeout_secs, 60);
        assert_eq!(
            config.kafka.properties.get("enable.idempotence").map(String::as_str),
            Some("true")
        );
        assert_eq!(config.schema_registry.url, "https://registry.internal:8081");
    }

    #[test]
    fn test_validation_catches_bad_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[kafka]
queue_capacity = 0
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(
                ValidationError::ZeroQueueCapacity
            ))
        ));
    }
}
