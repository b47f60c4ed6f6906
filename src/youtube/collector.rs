//! Comment and transcript collection over a list of videos
//!
//! Videos are processed one at a time. A video that fails is logged and
//! skipped; language model failures yield empty text.

use crate::output::{write_workbook, OutputResult, SheetData};
use crate::sources::{summarize_or_empty, SourceResult, Summarizer};
use crate::youtube::models::{remove_duplicates, CommentRow, TranscriptRow, VideoSummary};
use crate::youtube::traits::{TranscriptSource, VideoSource};
use std::path::Path;

pub const COMMENT_SUMMARY_PROMPT: &str =
    "summarize the following comments without losing any important points or opinions";
pub const TRANSCRIPT_ORGANIZE_PROMPT: &str =
    "rearrange the following text into a paragraph without losing any words";
pub const TRANSCRIPT_SUMMARY_PROMPT: &str =
    "summarize the following text without losing any important points";

/// A keyword search and how many of its hits to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    pub keyword: String,
    pub max_videos: u32,
    pub dedupe: bool,
}

/// Wraps `text` in quotes after an instruction
pub fn build_prompt(instruction: &str, text: &str) -> String {
    format!("{}:\n\"{}\".", instruction, text)
}

/// Searches for videos, optionally dropping duplicates
pub async fn find_videos(
    source: &dyn VideoSource,
    query: &VideoQuery,
) -> SourceResult<Vec<VideoSummary>> {
    let mut videos = source.search_videos(&query.keyword, query.max_videos).await?;
    tracing::info!("Found {} videos for `{}`", videos.len(), query.keyword);

    if query.dedupe {
        let before = videos.len();
        videos = remove_duplicates(videos);
        if videos.len() < before {
            tracing::info!("Removed {} duplicate videos", before - videos.len());
        }
    }

    Ok(videos)
}

fn log_progress(video: &VideoSummary, processed: usize, total: usize) {
    tracing::info!(
        "{} - videos processed: {}, remaining: {}",
        video.url(),
        processed,
        total - processed
    );
}

/// One row per comment, each carrying the summary of the video's comments
pub async fn collect_comments(
    source: &dyn VideoSource,
    summarizer: &dyn Summarizer,
    videos: &[VideoSummary],
) -> Vec<CommentRow> {
    let mut rows = Vec::new();

    for (index, video) in videos.iter().enumerate() {
        log_progress(video, index + 1, videos.len());

        let comments = match source.comment_threads(&video.video_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::error!("Skipping video {}: {}", video.video_id, e);
                continue;
            }
        };
        if comments.is_empty() {
            tracing::warn!("Video {} has no comments", video.video_id);
            continue;
        }

        let prompt = build_prompt(COMMENT_SUMMARY_PROMPT, &comments.join("\n"));
        let summary = summarize_or_empty(summarizer, &prompt).await;

        let url = video.url();
        rows.extend(comments.into_iter().map(|comment| CommentRow {
            title: video.title.clone(),
            url: url.clone(),
            comment,
            summary: summary.clone(),
        }));
    }

    rows
}

/// One row per video: details, rearranged transcript and its summary
///
/// A missing transcript is not an error; the row keeps the details with
/// whatever the model makes of the empty text.
pub async fn collect_transcripts(
    source: &dyn VideoSource,
    transcripts: &dyn TranscriptSource,
    summarizer: &dyn Summarizer,
    videos: &[VideoSummary],
) -> Vec<TranscriptRow> {
    let mut rows = Vec::with_capacity(videos.len());

    for (index, video) in videos.iter().enumerate() {
        log_progress(video, index + 1, videos.len());

        let details = match source.video_details(&video.video_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("Skipping video {}: {}", video.video_id, e);
                continue;
            }
        };

        let raw = match transcripts.transcript(&video.video_id).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Error getting transcript for video {}: {}", video.video_id, e);
                String::new()
            }
        };

        let transcript =
            summarize_or_empty(summarizer, &build_prompt(TRANSCRIPT_ORGANIZE_PROMPT, &raw)).await;
        let summary =
            summarize_or_empty(summarizer, &build_prompt(TRANSCRIPT_SUMMARY_PROMPT, &transcript))
                .await;

        rows.push(TranscriptRow {
            details,
            transcript,
            summary,
        });
    }

    rows
}

pub fn export_comment_archive(path: &Path, rows: &[CommentRow]) -> OutputResult<()> {
    write_workbook(path, &[SheetData::from_records("Comments", rows)])
}

pub fn export_transcript_record(path: &Path, rows: &[TranscriptRow]) -> OutputResult<()> {
    write_workbook(path, &[SheetData::from_records("Transcripts", rows)])
}
