//! Normalization of video metadata into the publish shape

use crate::source::models::{MappingError, VideoDetail};

/// Wire-level normalized record, keyed by video id at publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub title: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
}

/// Reduce full video metadata to the publish shape.
///
/// Counters absent upstream (disabled statistics) default to 0. A counter
/// that is present but does not parse as a non-negative integer fails closed
/// with a [`MappingError`] instead of silently defaulting.
pub fn summarize(detail: &VideoDetail) -> Result<PublishRecord, MappingError> {
    Ok(PublishRecord {
        title: detail.title.clone(),
        views: count_field("viewCount", detail.statistics.view_count.as_deref())?,
        likes: count_field("likeCount", detail.statistics.like_count.as_deref())?,
        comments: count_field("commentCount", detail.statistics.comment_count.as_deref())?,
    })
}

fn count_field(field: &'static str, raw: Option<&str>) -> Result<i64, MappingError> {
    let Some(raw) = raw else {
        return Ok(0);
    };

    let parsed: u64 = raw.parse().map_err(|_| MappingError::NonNumeric {
        field,
        value: raw.to_string(),
    })?;

    i64::try_from(parsed).map_err(|_| MappingError::NonNumeric {
        field,
        value: raw.to_string(),
    })
}
