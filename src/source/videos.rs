//! Single-video metadata lookup

use std::sync::Arc;

use super::client::{PageFetcher, VIDEOS_ENDPOINT};
use super::models::{MappingError, VideoDetail, VideoItem};
use super::{Result, SourceError};

/// Resolves a video id into full metadata via the videos endpoint.
///
/// The endpoint returns at most one matching item per id in this usage, so
/// only the first page is consulted.
pub struct VideoDetailSource {
    fetcher: Arc<dyn PageFetcher>,
}

impl VideoDetailSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn fetch(&self, video_id: &str) -> Result<VideoDetail> {
        let page = self
            .fetcher
            .fetch_page(
                VIDEOS_ENDPOINT,
                &[
                    ("id", video_id.to_string()),
                    ("part", "snippet,statistics".to_string()),
                ],
                None,
            )
            .await?;

        let Some(raw) = page.items.into_iter().next() else {
            // Listed but gone by lookup time - removed or made private.
            return Err(SourceError::NotFound {
                video_id: video_id.to_string(),
            });
        };

        let item: VideoItem =
            serde_json::from_value(raw).map_err(|e| MappingError::MalformedItem {
                context: "video",
                cause: e.to_string(),
            })?;

        Ok(VideoDetail::from(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::client::{FetchError, Page};
    use async_trait::async_trait;

    struct SingleVideo {
        item: Option<serde_json::Value>,
    }

    #[async_trait]
    impl PageFetcher for SingleVideo {
        async fn fetch_page(
            &self,
            endpoint: &str,
            params: &[(&str, String)],
            page_token: Option<&str>,
        ) -> std::result::Result<Page, FetchError> {
            assert_eq!(endpoint, VIDEOS_ENDPOINT);
            assert!(page_token.is_none());
            assert!(
                params
                    .iter()
                    .any(|(k, v)| *k == "part" && v == "snippet,statistics")
            );
            Ok(Page {
                items: self.item.iter().cloned().collect(),
                next_page_token: None,
            })
        }
    }

    #[tokio::test]
    async fn resolves_first_item() {
        let fetcher = Arc::new(SingleVideo {
            item: Some(serde_json::json!({
                "id": "vid1",
                "snippet": { "title": "Hello" },
                "statistics": { "viewCount": "42" }
            })),
        });
        let source = VideoDetailSource::new(fetcher);

        let detail = source.fetch("vid1").await.unwrap();
        assert_eq!(detail.video_id, "vid1");
        assert_eq!(detail.title, "Hello");
        assert_eq!(detail.statistics.view_count.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn empty_items_is_not_found() {
        let source = VideoDetailSource::new(Arc::new(SingleVideo { item: None }));

        let err = source.fetch("gone").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { video_id } if video_id == "gone"));
    }
}
