//! Shared HTTP plumbing for the API clients
//!
//! This module handles:
//! - Building HTTP clients with a descriptive user agent
//! - Issuing single best-effort JSON requests (no retries)
//! - Classifying HTTP failures into `SourceError`

use crate::sources::{SourceError, SourceResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Builds the user agent string sent to every platform
///
/// Format: `rust:social_archiver:v{version} (by /u/{username})`
pub fn user_agent(username: &str) -> String {
    let username = if username.is_empty() {
        "anonymous"
    } else {
        username
    };
    format!(
        "rust:social_archiver:v{} (by /u/{})",
        env!("CARGO_PKG_VERSION"),
        username
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use social_archiver::sources::{build_http_client, user_agent};
///
/// let client = build_http_client(&user_agent("someone")).unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a request and decodes the JSON body
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Decoded JSON value |
/// | HTTP 404 | `SourceError::NotFound` |
/// | Other status | `SourceError::Status` |
/// | Network failure | `SourceError::Http` |
/// | Invalid JSON | `SourceError::Decode` |
pub async fn send_json(request: RequestBuilder, url: &str) -> SourceResult<Value> {
    let response = request.send().await.map_err(|source| SourceError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| SourceError::Http {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&body)
        .map_err(|e| SourceError::Decode(format!("invalid JSON from {}: {}", url, e)))
}

/// Joins a configured base URL and a path without doubling slashes
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
