use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("kafka.bootstrap_servers must not be empty")]
    EmptyBootstrapServers,

    #[error("kafka.topic must not be empty")]
    EmptyTopic,

    #[error("kafka.queue_capacity must be positive")]
    ZeroQueueCapacity,

    #[error("kafka.flush_timeout_secs must be positive")]
    ZeroFlushTimeout,

    #[error("Invalid schema registry URL scheme in '{url}', expected http:// or https://")]
    InvalidRegistryScheme { url: String },

    #[error("schema_registry.subject must not be empty")]
    EmptySubject,

    #[error("youtube.api_base_url must not be empty")]
    EmptyApiBaseUrl,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_youtube(config)?;
    validate_kafka(config)?;
    validate_registry(config)?;
    Ok(())
}

fn validate_youtube(config: &Config) -> Result<(), ValidationError> {
    if config.youtube.api_base_url.trim().is_empty() {
        return Err(ValidationError::EmptyApiBaseUrl);
    }
    Ok(())
}

fn validate_kafka(config: &Config) -> Result<(), ValidationError> {
    if config.kafka.bootstrap_servers.trim().is_empty() {
        return Err(ValidationError::EmptyBootstrapServers);
    }
    if config.kafka.topic.trim().is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    if config.kafka.queue_capacity == 0 {
        return Err(ValidationError::ZeroQueueCapacity);
    }
    if config.kafka.flush_timeout_secs == 0 {
        return Err(ValidationError::ZeroFlushTimeout);
    }
    Ok(())
}

fn validate_registry(config: &Config) -> Result<(), ValidationError> {
    let url = &config.schema_registry.url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::InvalidRegistryScheme { url: url.clone() });
    }
    if config.schema_registry.subject.trim().is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_zero_queue_capacity() {
        let mut config = Config::default();
        config.kafka.queue_capacity = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn rejects_bad_registry_scheme() {
        let mut config = Config::default();
        config.schema_registry.url = "ftp://registry:21".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidRegistryScheme { .. })
        ));
    }

    #[test]
    fn rejects_empty_topic() {
        let mut config = Config::default();
        config.kafka.topic = "  ".to_string();
        assert!(matches!(validate(&config), Err(ValidationError::EmptyTopic)));
    }
}
