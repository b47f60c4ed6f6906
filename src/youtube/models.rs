//! Video records and exported rows

use crate::output::{Cell, Tabular};
use std::collections::HashSet;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
}

impl VideoSummary {
    pub fn url(&self) -> String {
        watch_url(&self.video_id)
    }
}

/// Snippet and statistics of a single video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    /// Hidden for some videos
    pub view_count: Option<i64>,
    pub url: String,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Drops exact duplicates, keeping the first occurrence of each video
pub fn remove_duplicates(videos: Vec<VideoSummary>) -> Vec<VideoSummary> {
    let mut seen = HashSet::new();
    videos
        .into_iter()
        .filter(|video| seen.insert(video.clone()))
        .collect()
}

/// One comment of a video, with the summary of all its comments
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    pub title: String,
    pub url: String,
    pub comment: String,
    pub summary: String,
}

impl Tabular for CommentRow {
    fn headers() -> &'static [&'static str] {
        &["Title", "URL", "Comments", "Comment Summary"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.title),
            Cell::text(&self.url),
            Cell::text(&self.comment),
            Cell::text(&self.summary),
        ]
    }
}

/// One video with its rearranged transcript and summary
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    pub details: VideoDetails,
    pub transcript: String,
    pub summary: String,
}

impl Tabular for TranscriptRow {
    fn headers() -> &'static [&'static str] {
        &[
            "Title",
            "Description",
            "Publish Date",
            "View Count",
            "URL",
            "Transcript",
            "Transcript Summary",
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        let views = match self.details.view_count {
            Some(count) => Cell::Integer(count),
            None => Cell::text(""),
        };
        vec![
            Cell::text(&self.details.title),
            Cell::text(&self.details.description),
            Cell::text(&self.details.published_at),
            views,
            Cell::text(&self.details.url),
            Cell::text(&self.transcript),
            Cell::text(&self.summary),
        ]
    }
}
