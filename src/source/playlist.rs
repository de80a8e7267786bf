//! Playlist enumeration over the paginated playlist-items endpoint

use std::collections::VecDeque;
use std::sync::Arc;

use super::client::{PLAYLIST_ITEMS_ENDPOINT, PageFetcher, Paginator};
use super::models::{MappingError, PlaylistItem};
use super::Result;

/// One playlist membership, reduced to the video it points at. Produced and
/// consumed within a single traversal pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
}

/// Enumerates every entry of a playlist in page order.
pub struct PlaylistSource {
    fetcher: Arc<dyn PageFetcher>,
}

impl PlaylistSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Start a traversal of `playlist_id`. Entries are yielded lazily, one
    /// buffered page at a time.
    pub fn entries(&self, playlist_id: &str) -> EntryCursor {
        let paginator = Paginator::new(
            Arc::clone(&self.fetcher),
            PLAYLIST_ITEMS_ENDPOINT,
            vec![
                ("playlistId", playlist_id.to_string()),
                ("part", "contentDetails".to_string()),
            ],
        );
        EntryCursor {
            paginator,
            buffered: VecDeque::new(),
        }
    }
}

/// Cursor over playlist entries across all pages.
pub struct EntryCursor {
    paginator: Paginator,
    buffered: VecDeque<PlaylistEntry>,
}

impl EntryCursor {
    /// Next entry in page order, or `None` when the playlist is exhausted.
    ///
    /// A playlist item without a video id is a [`MappingError`] and aborts the
    /// traversal: an upstream shape change must be visible, not skipped.
    pub async fn next(&mut self) -> Result<Option<PlaylistEntry>> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Ok(Some(entry));
            }

            let Some(page) = self.paginator.next_page().await? else {
                return Ok(None);
            };

            for raw in page.items {
                let item: PlaylistItem =
                    serde_json::from_value(raw).map_err(|e| MappingError::MalformedItem {
                        context: "playlist",
                        cause: e.to_string(),
                    })?;
                self.buffered.push_back(PlaylistEntry {
                    video_id: item.content_details.video_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::source::client::{FetchError, Page};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct PagedPlaylist {
        pages: Mutex<VecDeque<Page>>,
    }

    impl PagedPlaylist {
        fn new(pages: Vec<Page>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for PagedPlaylist {
        async fn fetch_page(
            &self,
            endpoint: &str,
            params: &[(&str, String)],
            _page_token: Option<&str>,
        ) -> std::result::Result<Page, FetchError> {
            assert_eq!(endpoint, PLAYLIST_ITEMS_ENDPOINT);
            assert!(
                params
                    .iter()
                    .any(|(k, v)| *k == "part" && v == "contentDetails")
            );
            Ok(self
                .pages
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .unwrap_or_default())
        }
    }

    fn playlist_page(ids: &[&str], token: Option<&str>) -> Page {
        Page {
            items: ids
                .iter()
                .map(|id| serde_json::json!({ "contentDetails": { "videoId": id } }))
                .collect(),
            next_page_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn yields_entries_across_pages_in_order() {
        let fetcher = PagedPlaylist::new(vec![
            playlist_page(&["a", "b"], Some("t1")),
            playlist_page(&["c"], None),
        ]);
        let source = PlaylistSource::new(fetcher);
        let mut cursor = source.entries("PL123");

        let mut ids = Vec::new();
        while let Some(entry) = cursor.next().await.unwrap() {
            ids.push(entry.video_id);
        }
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn skips_empty_pages_without_ending_traversal() {
        let fetcher = PagedPlaylist::new(vec![
            playlist_page(&[], Some("t1")),
            playlist_page(&["x"], None),
        ]);
        let source = PlaylistSource::new(fetcher);
        let mut cursor = source.entries("PL123");

        assert_eq!(
            cursor.next().await.unwrap(),
            Some(PlaylistEntry {
                video_id: "x".to_string()
            })
        );
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_item_is_fatal() {
        let pages = vec![Page {
            items: vec![serde_json::json!({ "contentDetails": {} })],
            next_page_token: None,
        }];
        let source = PlaylistSource::new(PagedPlaylist::new(pages));
        let mut cursor = source.entries("PL123");

        let err = cursor.next().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Mapping(MappingError::MalformedItem { context: "playlist", .. })
        ));
    }
}
