//! Raw upstream API item shapes
//!
//! These mirror the JSON the playlist-items and videos endpoints return.
//! Mapping failures here mean the upstream contract changed shape, which is
//! distinct from a transport or JSON-syntax failure.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("malformed {context} item: {cause}")]
    MalformedItem { context: &'static str, cause: String },

    #[error("statistics field '{field}' is non-numeric: '{value}'")]
    NonNumeric { field: &'static str, value: String },
}

/// One item of a `playlistItems` page, restricted to `part=contentDetails`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(rename = "contentDetails")]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

/// One item of a `videos` page with `part=snippet,statistics`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    /// Absent entirely when the owner has disabled statistics.
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
}

/// Upstream statistics counters. The API encodes them as decimal strings and
/// omits any counter the owner has disabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

/// Full metadata for one video, as resolved by the detail lookup.
#[derive(Debug, Clone)]
pub struct VideoDetail {
    pub video_id: String,
    pub title: String,
    pub statistics: VideoStatistics,
}

impl From<VideoItem> for VideoDetail {
    fn from(item: VideoItem) -> Self {
        Self {
            video_id: item.id,
            title: item.snippet.title,
            statistics: item.statistics,
        }
    }
}
