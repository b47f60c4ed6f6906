//! Keyword-driven YouTube collectors
//!
//! Two pipelines share the video search:
//! - Comments: every top-level comment plus a model summary per video,
//!   exported to `Comment Archive.xlsx`
//! - Transcripts: video details plus the rearranged transcript and its
//!   summary, exported to `Transcript Record.xlsx`

mod client;
mod collector;
pub mod models;
mod transcript;
mod traits;

pub use client::YouTubeClient;
pub use collector::{
    build_prompt, collect_comments, collect_transcripts, export_comment_archive,
    export_transcript_record, find_videos, VideoQuery, COMMENT_SUMMARY_PROMPT,
    TRANSCRIPT_ORGANIZE_PROMPT, TRANSCRIPT_SUMMARY_PROMPT,
};
pub use models::{remove_duplicates, CommentRow, TranscriptRow, VideoDetails, VideoSummary};
pub use transcript::{join_snippets, YtTranscriptSource};
pub use traits::{TranscriptSource, VideoSource};

use crate::config::ServiceConfig;
use crate::sources::{build_http_client, user_agent, OllamaClient, SourceError};
use crate::{ArchiveError, ConfigError};
use std::path::Path;

pub const COMMENT_ARCHIVE_FILE: &str = "Comment Archive.xlsx";
pub const TRANSCRIPT_RECORD_FILE: &str = "Transcript Record.xlsx";

fn clients(services: &ServiceConfig) -> Result<(YouTubeClient, OllamaClient), ArchiveError> {
    if services.youtube.api_key.is_empty() {
        return Err(ConfigError::Validation(
            "youtube api-key is required for video collection".to_string(),
        )
        .into());
    }

    let client = build_http_client(&user_agent("")).map_err(SourceError::from)?;
    Ok((
        YouTubeClient::new(client.clone(), &services.youtube),
        OllamaClient::new(client, &services.llm),
    ))
}

/// Searches, collects comments with summaries, and writes the workbook
///
/// Returns the number of exported rows.
pub async fn archive_comments(
    services: &ServiceConfig,
    query: &VideoQuery,
    output: &Path,
) -> Result<usize, ArchiveError> {
    let (videos, summarizer) = clients(services)?;

    let hits = find_videos(&videos, query).await?;
    let rows = collect_comments(&videos, &summarizer, &hits).await;
    export_comment_archive(output, &rows)?;

    tracing::info!("Video information exported to {}", output.display());
    Ok(rows.len())
}

/// Searches, collects details and transcripts with summaries, and writes the
/// workbook
///
/// Returns the number of exported rows.
pub async fn archive_transcripts(
    services: &ServiceConfig,
    query: &VideoQuery,
    output: &Path,
) -> Result<usize, ArchiveError> {
    let (videos, summarizer) = clients(services)?;
    let transcripts = YtTranscriptSource::new()?;

    let hits = find_videos(&videos, query).await?;
    let rows = collect_transcripts(&videos, &transcripts, &summarizer, &hits).await;
    export_transcript_record(output, &rows)?;

    tracing::info!("Video details exported to {}", output.display());
    Ok(rows.len())
}
