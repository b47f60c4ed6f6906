//! Crawler module for windowed Reddit archiving
//!
//! This module contains the core crawl logic:
//! - The lap driver and its phase state machine
//! - Wiring of the search, comment and storage collaborators for one run

mod coordinator;

pub use coordinator::{CrawlDirection, LapDriver, LapOutcome, RunSummary};

use crate::config::{validate_run_config, RunConfig, ServiceConfig};
use crate::sources::{build_http_client, user_agent, PushshiftClient, RedditClient, SourceError};
use crate::sources::{CommentExpander, SubmissionSearch};
use crate::storage::params::{read_params, window_from_params};
use crate::storage::OutputManager;
use crate::ArchiveError;
use std::path::Path;

/// Runs a complete Reddit crawl
///
/// This is the main entry point for archiving a subreddit. It will:
/// 1. Validate the run options
/// 2. Read the resume window from an earlier run, if any
/// 3. Build the HTTP client and the search / comment collaborators
/// 4. Create the run directory
/// 5. Drive every lap and export the workbook
///
/// # Arguments
///
/// * `config` - The run options
/// * `services` - Service endpoints
/// * `config_hash` - Hash of the service config file, recorded in `params.yaml`
///
/// # Returns
///
/// * `Ok(RunSummary)` - Crawl completed successfully
/// * `Err(ArchiveError)` - Crawl failed
pub async fn crawl(
    config: RunConfig,
    services: &ServiceConfig,
    config_hash: Option<String>,
) -> Result<RunSummary, ArchiveError> {
    validate_run_config(&config)?;

    // Bad resume input must fail before the run directory exists
    let window = match &config.resume_from {
        Some(path) => {
            let window = window_from_params(&read_params(Path::new(path))?);
            tracing::info!(
                "Resuming from {}: window {:?}..{:?}",
                path,
                window.lower,
                window.upper
            );
            Some(window)
        }
        None => None,
    };

    let client =
        build_http_client(&user_agent(&config.reddit_username)).map_err(SourceError::from)?;

    let search: Box<dyn SubmissionSearch> = Box::new(PushshiftClient::new(
        client.clone(),
        &services.reddit.search_url,
        &config.subreddit,
    ));

    let comments: Box<dyn CommentExpander> = if config.has_app_credentials() {
        Box::new(
            RedditClient::authenticate(
                client,
                &services.reddit,
                &config.reddit_id,
                &config.reddit_secret,
            )
            .await?,
        )
    } else {
        tracing::info!("No Reddit app credentials given, using public endpoints");
        Box::new(RedditClient::anonymous(client, &services.reddit.api_url))
    };

    let output = OutputManager::initialize(Path::new(&config.output_dir), &config.subreddit)?;

    let mut driver = LapDriver::new(config, search, comments, output, config_hash)?;
    if let Some(window) = window {
        driver = driver.with_window(window);
    }

    driver.run().await
}
