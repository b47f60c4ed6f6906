//! Output module for exporting collected records
//!
//! This module handles:
//! - Writing multi-sheet Excel workbooks
//! - Writing CSV mirrors of the normalized records
//! - Assembling the final Reddit archive of a run

mod csv_export;
mod spreadsheet;
mod traits;

pub use csv_export::write_csv;
pub use spreadsheet::{truncate_cell, write_workbook, SheetData, XLSX_MAX_CELL_CHARS};
pub use traits::{Cell, OutputError, OutputResult, Tabular};

use crate::normalize::{NormalizedComment, NormalizedSubmission};
use std::path::{Path, PathBuf};

/// File name of the run-level workbook
pub const REDDIT_ARCHIVE_FILE: &str = "RedditArchive.xlsx";

/// Writes `RedditArchive.xlsx` at the run root plus CSV mirrors
///
/// The workbook has two sheets, `Submissions` and `Comments`. The CSV files go
/// to `submissions/submissions.csv` and `comments/comments.csv`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the workbook
/// * `Err(OutputError)` - Failed to write one of the files
pub fn export_reddit_archive(
    run_dir: &Path,
    submissions: &[NormalizedSubmission],
    comments: &[NormalizedComment],
) -> OutputResult<PathBuf> {
    let workbook_path = run_dir.join(REDDIT_ARCHIVE_FILE);

    write_workbook(
        &workbook_path,
        &[
            SheetData::from_records("Submissions", submissions),
            SheetData::from_records("Comments", comments),
        ],
    )?;

    write_csv(&run_dir.join("submissions").join("submissions.csv"), submissions)?;
    write_csv(&run_dir.join("comments").join("comments.csv"), comments)?;

    Ok(workbook_path)
}
