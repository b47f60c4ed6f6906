//! Storage module for persisting crawl data
//!
//! This module handles everything a run writes to disk:
//! - The run directory layout
//! - Per-lap batches flushed to append-only NDJSON files
//! - The `params.yaml` metadata document with window and totals

mod layout;
mod manager;
mod ndjson;
pub mod params;
mod traits;

pub use layout::{RunLayout, PARAMS_FILE};
pub use manager::{Archive, FlushReport, OutputManager, Totals};
pub use ndjson::{append_records, NdjsonAppender};
pub use params::ParamsDocument;
pub use traits::{StorageError, StorageResult};
