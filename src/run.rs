//! Wires configuration, clients and pipeline together for one run

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use tubefeed::config::{Config, ConfigError};
use tubefeed::observability::Metrics;
use tubefeed::pipeline::{Pipeline, PipelineError, RunSummary};
use tubefeed::publish::{
    AvroEncoder, BrokerError, EncodeError, KafkaBroker, Publisher, RegistryError,
    SchemaRegistryClient,
};
use tubefeed::source::{FetchError, HttpPageFetcher, PageFetcher, PlaylistSource, VideoDetailSource};

use crate::cli::RunArgs;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("YOUTUBE_API_KEY is not set")]
    MissingApiKey,

    #[error("no playlist id configured (set youtube.playlist_id or pass --playlist)")]
    MissingPlaylistId,

    #[error("API client setup failed: {0}")]
    ApiClient(#[from] FetchError),

    #[error("schema resolution failed: {0}")]
    SchemaResolution(#[from] RegistryError),

    #[error("schema is unusable for encoding: {0}")]
    Encoder(#[from] EncodeError),

    #[error("broker setup failed: {0}")]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub async fn run(args: RunArgs) -> Result<RunSummary, RunError> {
    let mut config = Config::load_with_override(args.config)?;

    if let Some(playlist) = args.playlist {
        config.youtube.playlist_id = playlist;
    }
    if config.youtube.api_key.is_none() {
        return Err(RunError::MissingApiKey);
    }
    if config.youtube.playlist_id.trim().is_empty() {
        return Err(RunError::MissingPlaylistId);
    }

    // Resolve the value schema once up front; without it no record can be
    // validly encoded, so failure here is fatal before any fetch happens.
    let registry = SchemaRegistryClient::new(&config.schema_registry)?;
    let registered = registry
        .get_latest_version(&config.schema_registry.subject)
        .await?;
    info!(
        subject = %config.schema_registry.subject,
        schema_id = registered.id,
        "resolved publish schema"
    );
    let encoder = AvroEncoder::new(&registered)?;

    let metrics = Arc::new(Metrics::new());
    let broker = Arc::new(KafkaBroker::new(&config.kafka)?);
    let publisher = Publisher::new(
        broker,
        encoder,
        config.kafka.queue_capacity,
        Arc::clone(&metrics),
    );

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.youtube)?);
    let pipeline = Pipeline::new(
        PlaylistSource::new(Arc::clone(&fetcher)),
        VideoDetailSource::new(fetcher),
        publisher,
        config.youtube.playlist_id.clone(),
        Duration::from_secs(config.kafka.flush_timeout_secs),
        metrics,
    );

    Ok(pipeline.run().await?)
}
