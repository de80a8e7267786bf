//! Fetch/map/publish orchestration
//!
//! A single logical flow of control: enumerate the playlist, resolve each
//! entry to full metadata, normalize, publish. Only page fetches, publishing
//! under backpressure and the final flush ever block it. Delivery
//! acknowledgments complete out of band and are observed solely through the
//! final flush and the run counters.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::observability::Metrics;
use crate::publish::{PublishError, Publisher};
use crate::record::summarize;
use crate::source::{PlaylistSource, SourceError, VideoDetailSource};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("playlist traversal failed: {0}")]
    Playlist(#[source] SourceError),

    #[error("video detail lookup failed: {0}")]
    Detail(#[source] SourceError),

    #[error("record mapping failed: {0}")]
    Mapping(#[source] SourceError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of one completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub published: u64,
    pub skipped: u64,
    pub undelivered: usize,
}

pub struct Pipeline {
    playlist: PlaylistSource,
    videos: VideoDetailSource,
    publisher: Publisher,
    playlist_id: String,
    flush_timeout: Duration,
    metrics: Arc<Metrics>,
}

impl Pipeline {
    pub fn new(
        playlist: PlaylistSource,
        videos: VideoDetailSource,
        publisher: Publisher,
        playlist_id: String,
        flush_timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            playlist,
            videos,
            publisher,
            playlist_id,
            flush_timeout,
            metrics,
        }
    }

    /// Run one full pass over the playlist.
    ///
    /// Structural failures (fetch or mapping errors from the traversal)
    /// abort the run. A video that disappeared since being listed is logged
    /// and skipped. Delivery is best effort: a non-zero undelivered count
    /// after the final flush is reported in the summary, not an error.
    pub async fn run(&self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        info!(%run_id, playlist_id = %self.playlist_id, "starting playlist run");

        let mut entries = self.playlist.entries(&self.playlist_id);
        let mut published: u64 = 0;
        let mut skipped: u64 = 0;

        loop {
            let entry = match entries.next().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(PipelineError::Playlist(e)),
            };

            let detail = match self.videos.fetch(&entry.video_id).await {
                Ok(detail) => detail,
                Err(SourceError::NotFound { video_id }) => {
                    warn!(%run_id, %video_id, "video no longer available, skipping");
                    self.metrics.video_skipped();
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(PipelineError::Detail(e)),
            };

            let record = summarize(&detail)
                .map_err(|e| PipelineError::Mapping(SourceError::Mapping(e)))?;

            info!(
                %run_id,
                video_id = %detail.video_id,
                title = %record.title,
                views = record.views,
                likes = record.likes,
                comments = record.comments,
                "publishing video record"
            );

            self.publisher.publish(&entry.video_id, &record).await?;
            published += 1;
        }

        let undelivered = self.publisher.flush(self.flush_timeout).await;
        if undelivered > 0 {
            warn!(
                %run_id,
                undelivered,
                "flush deadline elapsed with undelivered records"
            );
        }

        let counters = self.metrics.snapshot();
        info!(
            %run_id,
            published,
            skipped,
            undelivered,
            delivered = counters.records_delivered,
            delivery_failures = counters.deliveries_failed,
            "playlist run complete"
        );

        Ok(RunSummary {
            published,
            skipped,
            undelivered,
        })
    }
}
