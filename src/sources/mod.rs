//! External collaborators
//!
//! This module contains the clients for every API the archiver consumes:
//! - Submission search (Pushshift)
//! - Comment-tree expansion (Reddit)
//! - Text summarization (Ollama)
//!
//! The lap driver only sees the traits, so tests can substitute in-memory
//! implementations.

mod http;
pub mod models;
mod ollama;
mod pushshift;
mod reddit;
mod traits;

pub use http::{build_http_client, endpoint, send_json, user_agent};
pub use models::{Comment, CommentForest, Submission};
pub use ollama::OllamaClient;
pub use pushshift::{decode_search_page, PushshiftClient};
pub use reddit::RedditClient;
pub use traits::{
    summarize_or_empty, CommentExpander, SourceError, SourceResult, SubmissionSearch, Summarizer,
};
