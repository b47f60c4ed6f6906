//! Output manager for one crawl run
//!
//! Records are buffered per lap. `flush` writes the lap's raw records to
//! append-only NDJSON files, adds the lap to the running totals, moves the
//! normalized records into the run archive and empties the buffer, all in one
//! call, so a lap can never be counted twice.

use crate::normalize::{NormalizedComment, NormalizedSubmission, RawRecord};
use crate::state::BoundWindow;
use crate::storage::layout::RunLayout;
use crate::storage::ndjson::append_records;
use crate::storage::params::{
    read_params, set_optional_param, set_param, write_params, ParamsDocument, TOTAL,
    TOTAL_COMMENTS, TOTAL_SUBMISSIONS, UTC_NEWER, UTC_OLDER,
};
use crate::storage::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Cumulative record counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub submissions: u64,
    pub comments: u64,
}

impl Totals {
    pub fn total(&self) -> u64 {
        self.submissions + self.comments
    }
}

/// Normalized records of every flushed lap, in flush order
#[derive(Debug, Clone, Default)]
pub struct Archive {
    pub submissions: Vec<NormalizedSubmission>,
    pub comments: Vec<NormalizedComment>,
}

/// What a single flush wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub submissions: usize,
    pub comments: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct Batch {
    submissions: Vec<NormalizedSubmission>,
    submissions_raw: Vec<RawRecord>,
    comments: Vec<NormalizedComment>,
    comments_raw: Vec<RawRecord>,
}

/// Owns a run directory and the records collected for it
pub struct OutputManager {
    layout: RunLayout,
    batch: Batch,
    archive: Archive,
    totals: Totals,
}

impl OutputManager {
    /// Creates a run directory under `base_dir/source_name` named after the
    /// current local time
    ///
    /// Two runs of the same source started within the same second share a
    /// directory.
    pub fn initialize(base_dir: &Path, source_name: &str) -> StorageResult<Self> {
        let run_id = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
        Self::initialize_with_run_id(base_dir, source_name, &run_id)
    }

    /// Creates a run directory with an explicit run id
    pub fn initialize_with_run_id(
        base_dir: &Path,
        source_name: &str,
        run_id: &str,
    ) -> StorageResult<Self> {
        let layout = RunLayout::new(base_dir, source_name, run_id);
        layout.create_dirs()?;

        tracing::info!("Run {} writing to {}", run_id, layout.root().display());

        Ok(Self {
            layout,
            batch: Batch::default(),
            archive: Archive::default(),
            totals: Totals::default(),
        })
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    pub fn run_id(&self) -> &str {
        self.layout.run_id()
    }

    pub fn run_dir(&self) -> &Path {
        self.layout.root()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Number of (submissions, comments) buffered since the last flush
    pub fn pending(&self) -> (usize, usize) {
        (self.batch.submissions.len(), self.batch.comments.len())
    }

    pub fn record_submission(&mut self, normalized: NormalizedSubmission, raw: RawRecord) {
        self.batch.submissions.push(normalized);
        self.batch.submissions_raw.push(raw);
    }

    pub fn record_comment(&mut self, normalized: NormalizedComment, raw: RawRecord) {
        self.batch.comments.push(normalized);
        self.batch.comments_raw.push(raw);
    }

    /// Writes the buffered lap and empties the buffer
    ///
    /// Raw records are appended to `{lap_label}.njson`, so reusing a label
    /// accumulates lines in the same file. Totals grow by the normalized
    /// batch sizes even when there is nothing to write.
    pub fn flush(&mut self, lap_label: &str) -> StorageResult<FlushReport> {
        if lap_label.is_empty()
            || lap_label.contains(['/', '\\'])
            || lap_label == "."
            || lap_label == ".."
        {
            return Err(StorageError::InvalidLabel(lap_label.to_string()));
        }

        let batch = std::mem::take(&mut self.batch);
        let mut report = FlushReport {
            submissions: batch.submissions.len(),
            comments: batch.comments.len(),
            files: Vec::new(),
        };

        self.totals.submissions += report.submissions as u64;
        self.totals.comments += report.comments as u64;

        if !batch.submissions_raw.is_empty() {
            let path = self.layout.raw_submissions_file(lap_label);
            append_records(&path, &batch.submissions_raw)?;
            report.files.push(path);
        }
        if !batch.comments_raw.is_empty() {
            let path = self.layout.raw_comments_file(lap_label);
            append_records(&path, &batch.comments_raw)?;
            report.files.push(path);
        }

        self.archive.submissions.extend(batch.submissions);
        self.archive.comments.extend(batch.comments);

        tracing::debug!(
            "Flushed lap {}: {} submissions, {} comments",
            lap_label,
            report.submissions,
            report.comments
        );

        Ok(report)
    }

    /// Writes the run metadata document, replacing the previous one
    pub fn persist_params(&self, doc: &ParamsDocument) -> StorageResult<()> {
        write_params(&self.layout.params_path(), doc)
    }

    pub fn load_params(&self) -> StorageResult<ParamsDocument> {
        read_params(&self.layout.params_path())
    }

    /// Records the window and the running totals in the metadata document
    pub fn update_bounds_and_persist(&self, window: BoundWindow) -> StorageResult<()> {
        let mut doc = self.load_params()?;

        set_optional_param(&mut doc, UTC_OLDER, window.lower);
        set_optional_param(&mut doc, UTC_NEWER, window.upper);
        set_param(&mut doc, TOTAL_COMMENTS, self.totals.comments);
        set_param(&mut doc, TOTAL_SUBMISSIONS, self.totals.submissions);
        set_param(&mut doc, TOTAL, self.totals.total());

        self.persist_params(&doc)
    }
}
