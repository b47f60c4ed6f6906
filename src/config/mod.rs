//! Configuration module for Social-Archiver
//!
//! Two kinds of configuration exist:
//!
//! - `ServiceConfig`: endpoints and API keys, read from an optional TOML file
//! - `RunConfig`: the options of one crawl invocation, built from CLI flags and
//!   persisted as the run's `params.yaml`
//!
//! # Example
//!
//! ```no_run
//! use social_archiver::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("services.toml")).unwrap();
//! println!("Searching submissions at: {}", config.reddit.search_url);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{LlmConfig, RedditConfig, RunConfig, ServiceConfig, YouTubeConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_or_default};
pub use validation::validate_run_config;
