use crate::storage::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// File name of the run metadata document
pub const PARAMS_FILE: &str = "params.yaml";

/// Directory layout of one run
///
/// ```text
/// {base}/{source}/{run_id}/
///     params.yaml
///     submissions/raw/{lap}.njson
///     comments/raw/{lap}.njson
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    run_id: String,
    root: PathBuf,
}

impl RunLayout {
    pub fn new(base_dir: &Path, source: &str, run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            root: base_dir.join(source).join(run_id),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn submissions_dir(&self) -> PathBuf {
        self.root.join("submissions")
    }

    pub fn submissions_raw_dir(&self) -> PathBuf {
        self.submissions_dir().join("raw")
    }

    pub fn comments_dir(&self) -> PathBuf {
        self.root.join("comments")
    }

    pub fn comments_raw_dir(&self) -> PathBuf {
        self.comments_dir().join("raw")
    }

    pub fn params_path(&self) -> PathBuf {
        self.root.join(PARAMS_FILE)
    }

    pub fn raw_submissions_file(&self, lap_label: &str) -> PathBuf {
        self.submissions_raw_dir().join(format!("{}.njson", lap_label))
    }

    pub fn raw_comments_file(&self, lap_label: &str) -> PathBuf {
        self.comments_raw_dir().join(format!("{}.njson", lap_label))
    }

    /// Creates the four run directories, keeping any that already exist
    pub fn create_dirs(&self) -> StorageResult<()> {
        if self.root.exists() {
            tracing::warn!(
                "Run directory {} already exists, records will be appended",
                self.root.display()
            );
        }

        for path in [
            self.submissions_dir(),
            self.submissions_raw_dir(),
            self.comments_dir(),
            self.comments_raw_dir(),
        ] {
            std::fs::create_dir_all(&path)
                .map_err(|source| StorageError::CreateDir { path, source })?;
        }

        Ok(())
    }
}
