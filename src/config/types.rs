use serde::{Deserialize, Serialize};

/// Service endpoints and credentials, loaded from an optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
}

/// Reddit and Pushshift endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    /// Base URL of the Pushshift-compatible submission search API
    #[serde(rename = "search-url", default = "default_search_url")]
    pub search_url: String,

    /// Base URL for anonymous Reddit JSON endpoints
    #[serde(rename = "api-url", default = "default_reddit_api_url")]
    pub api_url: String,

    /// Base URL used once an app-only token has been obtained
    #[serde(rename = "oauth-url", default = "default_reddit_oauth_url")]
    pub oauth_url: String,

    /// Token endpoint for the client-credentials grant
    #[serde(rename = "token-url", default = "default_reddit_token_url")]
    pub token_url: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            api_url: default_reddit_api_url(),
            oauth_url: default_reddit_oauth_url(),
            token_url: default_reddit_token_url(),
        }
    }
}

/// Language model endpoint (Ollama)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "base-url", default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
        }
    }
}

/// YouTube Data API endpoint and key
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    #[serde(rename = "api-url", default = "default_youtube_api_url")]
    pub api_url: String,

    #[serde(rename = "api-key", default)]
    pub api_key: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_url: default_youtube_api_url(),
            api_key: String::new(),
        }
    }
}

/// Options of one Reddit crawl invocation
///
/// This is the document written to `params.yaml` when a run starts. The client
/// secret is skipped so it never reaches the run directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub subreddit: String,
    pub output_dir: String,
    pub batch_size: usize,
    pub laps: u32,
    pub reddit_id: String,
    #[serde(skip)]
    pub reddit_secret: String,
    pub reddit_username: String,
    pub utc_after: Option<i64>,
    pub utc_before: Option<i64>,
    pub debug: bool,
    pub comments_cap: usize,
    /// `params.yaml` of an earlier run whose window seeds the first lap
    #[serde(default)]
    pub resume_from: Option<String>,
}

impl RunConfig {
    /// True when both halves of the Reddit app credentials are set
    pub fn has_app_credentials(&self) -> bool {
        !self.reddit_id.is_empty() && !self.reddit_secret.is_empty()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            subreddit: String::new(),
            output_dir: "./data".to_string(),
            batch_size: 1000,
            laps: 3,
            reddit_id: String::new(),
            reddit_secret: String::new(),
            reddit_username: String::new(),
            utc_after: None,
            utc_before: None,
            debug: false,
            comments_cap: 100,
            resume_from: None,
        }
    }
}

fn default_search_url() -> String {
    "https://api.pushshift.io".to_string()
}

fn default_reddit_api_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_reddit_oauth_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_reddit_token_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}

fn default_llm_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llava:34b".to_string()
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}
