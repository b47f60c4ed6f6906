//! Collaborator traits and error types
//!
//! The lap driver and the video collectors talk to every external API through
//! these traits, so clients are injected at run start and can be replaced in
//! tests.

use crate::sources::models::{CommentForest, Submission};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by external collaborators
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),
}

impl SourceError {
    /// True for the one per-item failure the crawl treats as expected
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for collaborator calls
pub type SourceResult<T> = Result<T, SourceError>;

/// Pages through a forum's historical submissions
#[async_trait]
pub trait SubmissionSearch: Send + Sync {
    /// Returns up to `limit` submissions strictly after or before a bound
    ///
    /// Exactly one of `after` / `before` is set by the lap driver.
    async fn search(
        &self,
        after: Option<i64>,
        before: Option<i64>,
        limit: usize,
    ) -> SourceResult<Vec<Submission>>;
}

/// Expands the comment tree of a submission
#[async_trait]
pub trait CommentExpander: Send + Sync {
    /// Returns the submission's comments, expanding at most
    /// `placeholder_cap` collapsed nodes
    ///
    /// Fails with `SourceError::NotFound` when the submission is gone.
    async fn expand_comments(
        &self,
        submission_id: &str,
        placeholder_cap: usize,
    ) -> SourceResult<CommentForest>;
}

/// Language model completion, text in and text out
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> SourceResult<String>;
}

/// Best-effort summarization: failures are logged and yield an empty string
pub async fn summarize_or_empty(summarizer: &dyn Summarizer, prompt: &str) -> String {
    match summarizer.summarize(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Language model call failed: {}", e);
            String::new()
        }
    }
}
