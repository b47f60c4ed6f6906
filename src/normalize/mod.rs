//! Record normalization
//!
//! Converts platform submissions and comments into the flat field sets that
//! end up in the spreadsheet, together with a raw archival copy for the
//! NDJSON files.

mod raw;

pub use raw::{RawRecord, NOT_SERIALIZABLE};

use crate::output::{Cell, Tabular};
use crate::sources::{Comment, Submission};
use serde::{Deserialize, Serialize};

/// Sentinel used when a submission carries no self text
pub const NO_SELFTEXT: &str = "<not selftext available>";

/// Flat projection of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSubmission {
    pub id: String,
    pub created_utc: i64,
    pub title: String,
    pub selftext: String,
    pub full_link: String,
}

/// Flat projection of a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedComment {
    pub id: String,
    pub submission_id: String,
    pub body: String,
    pub created_utc: i64,
    pub parent_id: String,
    pub permalink: String,
}

/// Replaces line breaks (`\r\n`, `\n` or a lone `\r`) with the two
/// characters `\n`
///
/// Keeps one record per line in line-oriented outputs.
pub fn escape_newlines(text: &str) -> String {
    text.replace("\r\n", "\\n")
        .replace('\r', "\\n")
        .replace('\n', "\\n")
}

/// Produces the normalized and raw representations of a submission
pub fn normalize_submission(submission: &Submission) -> (NormalizedSubmission, RawRecord) {
    let normalized = NormalizedSubmission {
        id: submission.id.clone(),
        created_utc: submission.created_utc,
        title: escape_newlines(&submission.title),
        selftext: submission
            .selftext
            .as_deref()
            .map(escape_newlines)
            .unwrap_or_else(|| NO_SELFTEXT.to_string()),
        full_link: submission.permalink.clone(),
    };

    (normalized, RawRecord::from(submission.raw.clone()))
}

/// Produces the normalized and raw representations of a comment
pub fn normalize_comment(submission_id: &str, comment: &Comment) -> (NormalizedComment, RawRecord) {
    let normalized = NormalizedComment {
        id: comment.id.clone(),
        submission_id: submission_id.to_string(),
        body: escape_newlines(&comment.body),
        created_utc: comment.created_utc,
        parent_id: comment.parent_id.clone(),
        permalink: comment.permalink.clone(),
    };

    (normalized, RawRecord::from(comment.raw.clone()))
}

impl Tabular for NormalizedSubmission {
    fn headers() -> &'static [&'static str] {
        &["id", "created_utc", "title", "selftext", "full_link"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.id),
            Cell::Integer(self.created_utc),
            Cell::text(&self.title),
            Cell::text(&self.selftext),
            Cell::text(&self.full_link),
        ]
    }
}

impl Tabular for NormalizedComment {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "submission_id",
            "body",
            "created_utc",
            "parent_id",
            "permalink",
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.id),
            Cell::text(&self.submission_id),
            Cell::text(&self.body),
            Cell::Integer(self.created_utc),
            Cell::text(&self.parent_id),
            Cell::text(&self.permalink),
        ]
    }
}
