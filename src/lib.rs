//! Social-Archiver: collects forum and video content into spreadsheet archives
//!
//! This crate implements a windowed, checkpointed Reddit crawler together with
//! keyword-driven YouTube comment and transcript collectors. Text can be
//! summarized through a local language model before export.

pub mod config;
pub mod crawler;
pub mod normalize;
pub mod output;
pub mod sources;
pub mod state;
pub mod storage;
pub mod youtube;

use thiserror::Error;

/// Main error type for Social-Archiver operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Source error: {0}")]
    Source(#[from] sources::SourceError),

    #[error("Export error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid lap transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::LapPhase,
        to: state::LapPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("`utc_after` ({after}) and `utc_before` ({before}) are mutually exclusive")]
    ConflictingBounds { after: i64, before: i64 },
}

/// Result type alias for Social-Archiver operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{RunConfig, ServiceConfig};
pub use crawler::LapDriver;
pub use state::{BoundWindow, LapPhase};
pub use storage::OutputManager;
