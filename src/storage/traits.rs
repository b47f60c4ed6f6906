//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Run metadata is not a mapping: {0}")]
    NotAMapping(String),

    #[error("Invalid lap label: {0:?}")]
    InvalidLabel(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
