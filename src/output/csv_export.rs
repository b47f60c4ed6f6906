use crate::output::traits::{Cell, OutputResult, Tabular};
use std::path::Path;

/// Writes records as an Excel-dialect CSV file with a header row
///
/// The header is written even when there are no records.
pub fn write_csv<T: Tabular>(path: &Path, records: &[T]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(T::headers())?;

    for record in records {
        writer.write_record(record.cells().iter().map(Cell::to_field))?;
    }

    writer.flush()?;
    Ok(())
}
