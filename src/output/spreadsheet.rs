//! Excel workbook generation
//!
//! Writes one or more sheets of `Tabular` records into a single `.xlsx` file,
//! with a bold header row.

use crate::output::traits::{Cell, OutputResult, Tabular};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Maximum number of characters Excel stores in one cell
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// The content of one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    /// Builds a sheet from records, one row per record
    pub fn from_records<T: Tabular>(name: &str, records: &[T]) -> Self {
        Self {
            name: name.to_string(),
            headers: T::headers().to_vec(),
            rows: records.iter().map(|record| record.cells()).collect(),
        }
    }
}

/// Writes all sheets into a workbook at `path`
///
/// # Arguments
///
/// * `path` - Destination of the `.xlsx` file (overwritten if present)
/// * `sheets` - Sheets in tab order
pub fn write_workbook(path: &Path, sheets: &[SheetData]) -> OutputResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col as u16, truncate_cell(text))?;
                    }
                    Cell::Integer(value) => {
                        worksheet.write_number(row_num, col as u16, *value as f64)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Cuts text to the per-cell limit so long transcripts do not fail the export
pub fn truncate_cell(text: &str) -> &str {
    match text.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
