//! Language model client for an Ollama server
//!
//! `POST {base_url}/api/generate` with `stream: false`; the completion is the
//! `response` field of the reply.

use crate::config::LlmConfig;
use crate::sources::http::{endpoint, send_json};
use crate::sources::{SourceError, SourceResult, Summarizer};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(client: Client, config: &LlmConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(&self, prompt: &str) -> SourceResult<String> {
        let url = endpoint(&self.base_url, "api/generate");
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let body = send_json(self.client.post(&url).json(&payload), &url).await?;

        body.get("response")
            .and_then(Value::as_str)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                SourceError::Decode("generate response has no `response` field".to_string())
            })
    }
}
