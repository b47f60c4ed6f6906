//! Collaborator traits of the video collectors

use crate::sources::SourceResult;
use crate::youtube::models::{VideoDetails, VideoSummary};
use async_trait::async_trait;

/// Video search, metadata and comments
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Returns at most `max_results` videos matching `keyword`
    async fn search_videos(&self, keyword: &str, max_results: u32)
        -> SourceResult<Vec<VideoSummary>>;

    /// Fails with `SourceError::NotFound` for unknown ids
    async fn video_details(&self, video_id: &str) -> SourceResult<VideoDetails>;

    /// Text of every top-level comment, across all pages
    async fn comment_threads(&self, video_id: &str) -> SourceResult<Vec<String>>;
}

/// Spoken-text transcripts
///
/// The transcript library's futures are not `Send`, so neither are these.
#[async_trait(?Send)]
pub trait TranscriptSource {
    /// The transcript's snippet texts joined by single spaces
    async fn transcript(&self, video_id: &str) -> SourceResult<String>;
}
