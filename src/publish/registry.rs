//! Confluent-style schema registry lookup
//!
//! Only the latest-version lookup is needed: the schema is resolved once at
//! startup and reused for every record of the run.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::SchemaRegistryConfig;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("schema registry request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("schema registry returned HTTP {status} for subject '{subject}'")]
    Status { subject: String, status: u16 },

    #[error("malformed schema registry response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid registry client configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Latest registered schema version for a subject.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredSchema {
    pub id: u32,
    pub version: u32,
    pub subject: String,
    pub schema: String,
}

pub struct SchemaRegistryClient {
    http: Client,
    base_url: String,
    basic_auth: Option<(String, String)>,
}

impl SchemaRegistryClient {
    pub fn new(config: &SchemaRegistryConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RegistryError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            basic_auth: config.basic_auth.clone(),
        })
    }

    pub async fn get_latest_version(&self, subject: &str) -> Result<RegisteredSchema> {
        let url = format!("{}/subjects/{}/versions/latest", self.base_url, subject);

        let mut request = self.http.get(&url);
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(RegistryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                subject: subject.to_string(),
                status: status.as_u16(),
            });
        }

        let registered: RegisteredSchema =
            response.json().await.map_err(RegistryError::Decode)?;
        debug!(
            subject,
            schema_id = registered.id,
            version = registered.version,
            "resolved latest schema version"
        );
        Ok(registered)
    }
}
