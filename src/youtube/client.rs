//! YouTube Data API v3 client
//!
//! Every request carries the API key as the `key` query parameter. Responses
//! are decoded into the few fields the collectors export.

use crate::config::YouTubeConfig;
use crate::sources::{endpoint, send_json, SourceError, SourceResult};
use crate::youtube::models::{watch_url, VideoDetails, VideoSummary};
use crate::youtube::traits::VideoSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Page size of `commentThreads`; the API maximum
const COMMENT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    description: String,
    channel_title: String,
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchId {
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct ThreadItem {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Client for the search, videos and commentThreads endpoints
pub struct YouTubeClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(client: Client, config: &YouTubeConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> SourceResult<ItemPage<T>> {
        let url = endpoint(&self.api_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let request = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())]);
        let body = send_json(request, &url).await?;

        serde_json::from_value(body)
            .map_err(|e| SourceError::Decode(format!("unexpected {} response: {}", path, e)))
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn search_videos(
        &self,
        keyword: &str,
        max_results: u32,
    ) -> SourceResult<Vec<VideoSummary>> {
        let page: ItemPage<SearchItem> = self
            .get_page(
                "search",
                &[
                    ("q", keyword.to_string()),
                    ("part", "id,snippet".to_string()),
                    ("maxResults", max_results.to_string()),
                ],
            )
            .await?;

        let videos = page
            .items
            .into_iter()
            .filter(|item| item.id.kind == "youtube#video")
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(VideoSummary {
                    video_id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                    channel_title: item.snippet.channel_title,
                    published_at: item.snippet.published_at,
                })
            })
            .collect();

        Ok(videos)
    }

    async fn video_details(&self, video_id: &str) -> SourceResult<VideoDetails> {
        let page: ItemPage<VideoItem> = self
            .get_page(
                "videos",
                &[
                    ("part", "snippet,statistics".to_string()),
                    ("id", video_id.to_string()),
                ],
            )
            .await?;

        let item = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("video {}", video_id)))?;

        Ok(VideoDetails {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            view_count: item
                .statistics
                .view_count
                .and_then(|count| count.parse().ok()),
            url: watch_url(video_id),
        })
    }

    async fn comment_threads(&self, video_id: &str) -> SourceResult<Vec<String>> {
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "snippet".to_string()),
                ("videoId", video_id.to_string()),
                ("maxResults", COMMENT_PAGE_SIZE.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ItemPage<ThreadItem> = self.get_page("commentThreads", &query).await?;
            comments.extend(
                page.items
                    .into_iter()
                    .map(|item| item.snippet.top_level_comment.snippet.text_display),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Video {}: {} comments", video_id, comments.len());
        Ok(comments)
    }
}
