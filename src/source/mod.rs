//! Upstream playlist and video sources

pub mod client;
pub mod models;
pub mod playlist;
pub mod videos;

use thiserror::Error;

pub use client::{FetchError, HttpPageFetcher, Page, PageFetcher, Paginator};
pub use models::{MappingError, VideoDetail};
pub use playlist::{PlaylistEntry, PlaylistSource};
pub use videos::VideoDetailSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The video disappeared (removed or made private) between being listed
    /// and being looked up. Expected over a long-lived playlist; callers may
    /// skip and continue.
    #[error("video '{video_id}' not found upstream")]
    NotFound { video_id: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;
