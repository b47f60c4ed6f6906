//! Output traits and types
//!
//! This module defines the row interface shared by every exported record and
//! the error type of the export layer.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// The cell as a CSV field
    pub fn to_field(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
        }
    }
}

/// A record that can be exported as one row of a sheet
///
/// `cells` must return exactly one cell per header, in header order.
pub trait Tabular {
    /// Column names, written as the first row
    fn headers() -> &'static [&'static str];

    /// The row for this record
    fn cells(&self) -> Vec<Cell>;
}
