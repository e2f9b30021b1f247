use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::OpenOptions;
use std::path::Path;

use super::buffers::ColumnBuffers;
use crate::error::OutputToolError;

/// Statistics for a single chunk append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Data rows appended (header excluded).
    pub rows_written: usize,
    /// Whether this append wrote the header row.
    pub wrote_header: bool,
}

/// Record terminator for the target platform.
fn platform_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Appends the buffered rows to the CSV file at `path`, then clears the buffers.
///
/// The file is opened in append mode (created if missing) and closed again
/// before returning. Columns are transposed into rows: row `i` of the output
/// is entry `i` of every buffer. The header row goes out with the first
/// append only. A layout with no fields writes nothing.
///
/// Fields containing commas, double quotes, or newlines are quoted by the
/// underlying csv crate; everything else is written bare.
pub fn append_columns(
    path: &Path,
    buffers: &mut ColumnBuffers,
) -> Result<WriteStats, OutputToolError> {
    let mut stats = WriteStats::default();

    if buffers.num_columns() == 0 {
        buffers.clear();
        return Ok(stats);
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .terminator(platform_terminator())
        .from_writer(file);

    if !buffers.header_written() {
        writer.write_record(buffers.names())?;
        stats.wrote_header = true;
    }

    for row in 0..buffers.pending_rows() {
        writer.write_record(buffers.row(row))?;
    }
    stats.rows_written = buffers.pending_rows();

    writer.flush()?;
    drop(writer);

    if stats.wrote_header {
        buffers.mark_header_written();
    }
    buffers.clear();

    Ok(stats)
}
