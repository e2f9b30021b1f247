//! In-memory column buffers for rows awaiting a flush.

use crate::host::{Record, RecordInfo};

/// Column-oriented buffer for rows that have not been written yet.
///
/// Holds one growable buffer per field. Every buffer has exactly one entry
/// per pending row. Clearing keeps the allocations so the next chunk reuses
/// them.
///
/// The header row is tracked separately: it is owed until the first flush
/// writes it and is never written again.
#[derive(Debug, Clone)]
pub struct ColumnBuffers {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
    pending_rows: usize,
    header_written: bool,
}

impl ColumnBuffers {
    /// Creates empty buffers for the given field names.
    pub fn new(names: Vec<String>) -> Self {
        let columns = vec![Vec::new(); names.len()];
        Self {
            names,
            columns,
            pending_rows: 0,
            header_written: false,
        }
    }

    /// Creates one buffer per field of the record layout.
    pub fn from_record_info(record_info: &RecordInfo) -> Self {
        Self::new(
            record_info
                .fields()
                .iter()
                .map(|field| field.name.clone())
                .collect(),
        )
    }

    /// Appends one row. Null values and fields missing from the record are
    /// stored as empty strings.
    pub fn push_record(&mut self, record_info: &RecordInfo, record: &Record) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            let value = record_info.get_as_string(record, index).unwrap_or("");
            column.push(value.to_string());
        }
        self.pending_rows += 1;
    }

    /// Field names, in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows buffered since the last flush.
    pub fn pending_rows(&self) -> usize {
        self.pending_rows
    }

    pub fn has_pending_rows(&self) -> bool {
        self.pending_rows > 0
    }

    /// Whether the header row has already gone to disk.
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    pub(crate) fn mark_header_written(&mut self) {
        self.header_written = true;
    }

    /// Values of pending row `row`, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(move |column| column[row].as_str())
    }

    /// Drops all pending rows, keeping each buffer's capacity.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.pending_rows = 0;
    }

    /// Smallest capacity across the buffers.
    #[cfg(test)]
    fn min_capacity(&self) -> usize {
        self.columns.iter().map(Vec::capacity).min().unwrap_or(0)
    }
}
