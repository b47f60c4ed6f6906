//! Transcripts through `yt-transcript-rs`

use crate::sources::{SourceError, SourceResult};
use crate::youtube::traits::TranscriptSource;
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Transcript languages in order of preference
const LANGUAGES: &[&str] = &["en"];

pub struct YtTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YtTranscriptSource {
    /// Creates a source without proxy or cookie authentication
    pub fn new() -> SourceResult<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| SourceError::Transcript(e.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait(?Send)]
impl TranscriptSource for YtTranscriptSource {
    async fn transcript(&self, video_id: &str) -> SourceResult<String> {
        let fetched = self
            .api
            .fetch_transcript(video_id, LANGUAGES, false)
            .await
            .map_err(|e| SourceError::Transcript(format!("{}: {}", video_id, e)))?;

        tracing::debug!(
            "Transcript of {}: {} snippets, language {}",
            video_id,
            fetched.snippets.len(),
            fetched.language_code
        );

        Ok(join_snippets(fetched.snippets.iter().map(|s| s.text.as_str())))
    }
}

/// Joins snippet texts with single spaces, skipping empty snippets
pub fn join_snippets<'a, I>(snippets: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    snippets
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
