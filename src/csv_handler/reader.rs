use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

use crate::error::OutputToolError;
use crate::host::{Record, RecordInfo};

/// Reader for the source CSV fed to the tool by the command-line host.
///
/// The header row becomes the record layout; every following row becomes a
/// [`Record`] with no null values. Rows with a different field count than the
/// header are rejected with their line number.
pub struct SourceReader {
    /// The underlying CSV reader wrapping a file handle.
    reader: Reader<File>,
    /// Layout taken from the header row.
    record_info: RecordInfo,
    /// Size of the file, used for progress reporting.
    total_bytes: u64,
    /// Current line number (1-indexed, header row is line 1).
    current_line: u64,
    /// Reused between reads.
    buffer: StringRecord,
}

impl SourceReader {
    /// Opens `path` and reads its header row.
    pub fn new(path: &Path) -> Result<Self, OutputToolError> {
        let total_bytes = std::fs::metadata(path)?.len();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let record_info = RecordInfo::from_names(reader.headers()?.iter());

        Ok(Self {
            reader,
            record_info,
            total_bytes,
            current_line: 1,
            buffer: StringRecord::new(),
        })
    }

    pub fn record_info(&self) -> &RecordInfo {
        &self.record_info
    }

    /// Reads the next record, or `None` at end of file.
    pub fn read_next(&mut self) -> Option<Result<Record, OutputToolError>> {
        match self.reader.read_record(&mut self.buffer) {
            Ok(false) => None,
            Ok(true) => {
                self.current_line += 1;
                Some(self.convert())
            }
            Err(e) => Some(Err(e.into())),
        }
    }

    fn convert(&self) -> Result<Record, OutputToolError> {
        if self.buffer.len() != self.record_info.num_fields() {
            return Err(OutputToolError::InvalidArgument(format!(
                "Line {}: Expected {} fields but got {}",
                self.current_line,
                self.record_info.num_fields(),
                self.buffer.len()
            )));
        }
        Ok(Record::from_strings(self.buffer.iter()))
    }

    /// Fraction of the file consumed so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        let consumed = self.reader.position().byte() as f64;
        (consumed / self.total_bytes as f64).min(1.0)
    }
}
