use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub schema_registry: SchemaRegistryConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YoutubeConfig {
    /// API key (loaded from environment, not from config file)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Playlist to traverse; may be overridden on the command line
    #[serde(default)]
    pub playlist_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            playlist_id: String::new(),
            api_base_url: default_api_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Broker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KafkaConfig {
    #[serde(default = "default_bootstrap_servers")]
    pub bootstrap_servers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    /// In-flight delivery budget; publishing blocks once it is exhausted
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,
    /// Extra librdkafka properties passed through verbatim
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: default_bootstrap_servers(),
            topic: default_topic(),
            queue_capacity: default_queue_capacity(),
            flush_timeout_secs: default_flush_timeout_secs(),
            properties: BTreeMap::new(),
        }
    }
}

fn default_bootstrap_servers() -> String {
    "localhost:9092".to_string()
}

fn default_topic() -> String {
    "youtubeVideos".to_string()
}

fn default_queue_capacity() -> usize {
    256
}

fn default_flush_timeout_secs() -> u64 {
    30
}

/// Schema registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaRegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_registry_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Basic-auth credentials (loaded from environment, not from config file)
    #[serde(skip)]
    pub basic_auth: Option<(String, String)>,
}

impl Default for SchemaRegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            subject: default_subject(),
            request_timeout_secs: default_registry_timeout_secs(),
            basic_auth: None,
        }
    }
}

fn default_registry_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_subject() -> String {
    "youtubeVideos-value".to_string()
}

fn default_registry_timeout_secs() -> u64 {
    10
}
