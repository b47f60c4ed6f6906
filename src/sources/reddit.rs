//! Reddit comment-tree expansion
//!
//! The comment tree of a submission is read from `/comments/{id}.json`.
//! Collapsed `more` placeholders are expanded breadth-first through
//! `/api/morechildren.json`, up to the caller's cap.

use crate::config::RedditConfig;
use crate::sources::http::{endpoint, send_json};
use crate::sources::models::{Comment, CommentForest};
use crate::sources::{CommentExpander, SourceError, SourceResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::VecDeque;

/// Reddit accepts at most this many ids per `morechildren` call
const MORECHILDREN_BATCH: usize = 100;

/// Client for Reddit's JSON endpoints
pub struct RedditClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl RedditClient {
    /// A client for the public, unauthenticated endpoints
    pub fn anonymous(client: Client, api_url: &str) -> Self {
        Self {
            client,
            base_url: api_url.to_string(),
            access_token: None,
        }
    }

    /// Exchanges pre-provisioned app credentials for a token, once
    ///
    /// The token is not refreshed; runs are expected to finish within its
    /// lifetime.
    pub async fn authenticate(
        client: Client,
        config: &RedditConfig,
        client_id: &str,
        client_secret: &str,
    ) -> SourceResult<Self> {
        let request = client
            .post(&config.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let body = send_json(request, &config.token_url).await?;
        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::Decode("token response has no access_token".to_string()))?
            .to_string();

        tracing::info!("Obtained app-only Reddit token");

        Ok(Self {
            client,
            base_url: config.oauth_url.clone(),
            access_token: Some(token),
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn more_children(
        &self,
        submission_id: &str,
        children: &[String],
    ) -> SourceResult<Vec<Value>> {
        let url = endpoint(&self.base_url, "api/morechildren.json");
        let query = [
            ("api_type", "json".to_string()),
            ("raw_json", "1".to_string()),
            ("link_id", format!("t3_{}", submission_id)),
            ("children", children.join(",")),
        ];

        let body = send_json(self.get(&url).query(&query), &url).await?;

        match body.pointer("/json/data/things") {
            Some(Value::Array(things)) => Ok(things.clone()),
            _ => Err(SourceError::Decode(
                "morechildren response has no things".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CommentExpander for RedditClient {
    async fn expand_comments(
        &self,
        submission_id: &str,
        placeholder_cap: usize,
    ) -> SourceResult<CommentForest> {
        let url = endpoint(&self.base_url, &format!("comments/{}.json", submission_id));
        let body = send_json(self.get(&url).query(&[("raw_json", "1")]), &url).await?;

        // [submission listing, comment listing]
        let mut queue: VecDeque<Value> = match body.get(1) {
            Some(listing) => listing_children(listing).into(),
            None => {
                return Err(SourceError::Decode(format!(
                    "comment response for {} has no comment listing",
                    submission_id
                )))
            }
        };

        let mut forest = CommentForest::default();
        let mut placeholders: VecDeque<Vec<String>> = VecDeque::new();
        let mut expanded = 0;

        loop {
            while let Some(thing) = queue.pop_front() {
                visit(thing, &mut queue, &mut placeholders, &mut forest);
            }

            if expanded >= placeholder_cap {
                break;
            }
            let Some(mut children) = placeholders.pop_front() else {
                break;
            };
            if children.len() > MORECHILDREN_BATCH {
                placeholders.push_back(children.split_off(MORECHILDREN_BATCH));
            }

            expanded += 1;
            match self.more_children(submission_id, &children).await {
                Ok(things) => queue.extend(things),
                Err(e) => {
                    tracing::warn!("Failed to expand comments of {}: {}", submission_id, e);
                    forest.collapsed += 1;
                }
            }
        }

        forest.collapsed += placeholders.len();
        tracing::debug!(
            "Submission {}: {} comments, {} placeholders expanded, {} collapsed",
            submission_id,
            forest.len(),
            expanded,
            forest.collapsed
        );

        Ok(forest)
    }
}

/// Routes one thing of a listing: comments are decoded and their replies
/// queued, placeholders are set aside for expansion
fn visit(
    thing: Value,
    queue: &mut VecDeque<Value>,
    placeholders: &mut VecDeque<Vec<String>>,
    forest: &mut CommentForest,
) {
    let kind = thing.get("kind").and_then(Value::as_str).unwrap_or_default().to_string();
    let Some(data) = thing.get("data").cloned() else {
        return;
    };

    match kind.as_str() {
        "t1" => {
            if let Some(replies) = data.get("replies") {
                queue.extend(listing_children(replies));
            }
            match Comment::from_payload(data) {
                Ok(comment) => forest.comments.push(comment),
                Err(e) => tracing::warn!("Skipping undecodable comment: {}", e),
            }
        }
        "more" => {
            let children: Vec<String> = data
                .get("children")
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default();

            // "continue this thread" links carry no ids
            if children.is_empty() {
                forest.collapsed += 1;
            } else {
                placeholders.push_back(children);
            }
        }
        _ => {}
    }
}

/// Children of a `Listing`; an empty string (no replies) yields nothing
fn listing_children(listing: &Value) -> Vec<Value> {
    listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
