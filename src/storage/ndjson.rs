use crate::normalize::RawRecord;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Buffered NDJSON writer that appends to an existing file
///
/// Each record becomes exactly one line terminated by `\n`, so successive
/// appends to the same file never merge lines.
pub struct NdjsonAppender {
    w: BufWriter<File>,
    lines: usize,
}

impl NdjsonAppender {
    pub fn open(path: &Path) -> io::Result<Self> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines: 0,
        })
    }

    pub fn write_record(&mut self, record: &RawRecord) -> io::Result<()> {
        self.w.write_all(record.to_json_line().as_bytes())?;
        self.w.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Flushes the buffer and returns the number of lines written
    pub fn finish(mut self) -> io::Result<usize> {
        self.w.flush()?;
        Ok(self.lines)
    }
}

/// Appends all records to `path`, creating the file if needed
pub fn append_records(path: &Path, records: &[RawRecord]) -> io::Result<usize> {
    let mut appender = NdjsonAppender::open(path)?;
    for record in records {
        appender.write_record(record)?;
    }
    appender.finish()
}
