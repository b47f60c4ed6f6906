//! Pushshift-compatible submission search
//!
//! `GET {search_url}/reddit/search/submission` with `subreddit`, `size`, one
//! of `after` / `before`, and a sort order matching the crawl direction so
//! that the first `size` results sit next to the bound.

use crate::sources::http::{endpoint, send_json};
use crate::sources::models::Submission;
use crate::sources::{SourceError, SourceResult, SubmissionSearch};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Client for the submission search API
pub struct PushshiftClient {
    client: Client,
    base_url: String,
    subreddit: String,
}

impl PushshiftClient {
    pub fn new(client: Client, base_url: &str, subreddit: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            subreddit: subreddit.to_string(),
        }
    }
}

#[async_trait]
impl SubmissionSearch for PushshiftClient {
    async fn search(
        &self,
        after: Option<i64>,
        before: Option<i64>,
        limit: usize,
    ) -> SourceResult<Vec<Submission>> {
        let url = endpoint(&self.base_url, "reddit/search/submission");

        let mut query: Vec<(&str, String)> = vec![
            ("subreddit", self.subreddit.clone()),
            ("size", limit.to_string()),
            ("sort_type", "created_utc".to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
            query.push(("sort", "asc".to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.to_string()));
            query.push(("sort", "desc".to_string()));
        }

        tracing::debug!("Searching {} with {:?}", url, query);
        let body = send_json(self.client.get(&url).query(&query), &url).await?;

        decode_search_page(body)
    }
}

/// Decodes `{"data": [...]}`, skipping entries that are not submissions
pub fn decode_search_page(body: Value) -> SourceResult<Vec<Submission>> {
    let entries = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(SourceError::Decode(
                    "search response has no `data` array".to_string(),
                ))
            }
        },
        _ => {
            return Err(SourceError::Decode(
                "search response is not an object".to_string(),
            ))
        }
    };

    let mut submissions = Vec::with_capacity(entries.len());
    for entry in entries {
        match Submission::from_payload(entry) {
            Ok(submission) => submissions.push(submission),
            Err(e) => tracing::warn!("Skipping undecodable submission: {}", e),
        }
    }

    Ok(submissions)
}
