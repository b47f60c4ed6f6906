use crate::config::types::{LlmConfig, RedditConfig, RunConfig, ServiceConfig, YouTubeConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire service configuration
pub fn validate(config: &ServiceConfig) -> Result<(), ConfigError> {
    validate_reddit_config(&config.reddit)?;
    validate_llm_config(&config.llm)?;
    validate_youtube_config(&config.youtube)?;
    Ok(())
}

/// Validates the options of a crawl run before anything touches the disk
pub fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if let (Some(after), Some(before)) = (config.utc_after, config.utc_before) {
        return Err(ConfigError::ConflictingBounds { after, before });
    }

    if config.subreddit.trim().is_empty() {
        return Err(ConfigError::Validation(
            "subreddit cannot be empty".to_string(),
        ));
    }

    if config
        .subreddit
        .chars()
        .any(|c| !(c.is_alphanumeric() || c == '_'))
    {
        return Err(ConfigError::Validation(format!(
            "subreddit must contain only alphanumeric characters and underscores, got '{}'",
            config.subreddit
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.laps < 1 {
        return Err(ConfigError::Validation(format!(
            "laps must be >= 1, got {}",
            config.laps
        )));
    }

    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_reddit_config(config: &RedditConfig) -> Result<(), ConfigError> {
    validate_url("reddit.search-url", &config.search_url)?;
    validate_url("reddit.api-url", &config.api_url)?;
    validate_url("reddit.oauth-url", &config.oauth_url)?;
    validate_url("reddit.token-url", &config.token_url)?;
    Ok(())
}

fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    validate_url("llm.base-url", &config.base_url)?;

    if config.model.is_empty() {
        return Err(ConfigError::Validation(
            "llm.model cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_youtube_config(config: &YouTubeConfig) -> Result<(), ConfigError> {
    validate_url("youtube.api-url", &config.api_url)
}

/// Endpoints must be absolute http(s) URLs
fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, value
        )));
    }

    Ok(())
}
