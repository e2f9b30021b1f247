//! Record sink
//!
//! One [`RecordSink`] exists per incoming connection. The host drives it
//! through [`IncomingInterface`]: the record layout first, then every record,
//! interleaved with progress updates, and finally `close`.
//!
//! Rows are buffered column by column and appended to the output file each
//! time the flush threshold is reached, plus once more on close if rows are
//! still pending.

use tracing::{debug, info, warn};

use crate::csv_handler::ColumnBuffers;
use crate::error::OutputToolError;
use crate::host::{IncomingInterface, MessageType, Record, RecordInfo};
use crate::plugin::{OutputTool, ToolHandle};
use crate::validator::validate_output_path;

/// Lifecycle phase of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkPhase {
    /// Waiting for the record layout.
    Uninitialized,
    /// Receiving records.
    Accumulating,
    /// Final chunk written; no further calls accepted.
    Closed,
}

enum SinkState {
    Uninitialized,
    Accumulating {
        record_info: RecordInfo,
        buffers: ColumnBuffers,
    },
    Closed,
}

/// Buffers incoming records and writes them to the configured CSV file.
pub struct RecordSink {
    handle: ToolHandle,
    state: SinkState,
    total_rows: u64,
    chunks_written: u64,
}

impl RecordSink {
    pub(crate) fn new(handle: ToolHandle) -> Self {
        Self {
            handle,
            state: SinkState::Uninitialized,
            total_rows: 0,
            chunks_written: 0,
        }
    }

    pub fn phase(&self) -> SinkPhase {
        match self.state {
            SinkState::Uninitialized => SinkPhase::Uninitialized,
            SinkState::Accumulating { .. } => SinkPhase::Accumulating,
            SinkState::Closed => SinkPhase::Closed,
        }
    }

    /// Records received over the lifetime of the sink.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Number of appends made to the output file.
    pub fn chunks_written(&self) -> u64 {
        self.chunks_written
    }

    /// Rows buffered since the last flush.
    pub fn pending_rows(&self) -> usize {
        match &self.state {
            SinkState::Accumulating { buffers, .. } => buffers.pending_rows(),
            _ => 0,
        }
    }

    fn flush(&mut self) -> Result<(), OutputToolError> {
        if let SinkState::Accumulating { buffers, .. } = &mut self.state {
            let path = self.handle.file_path();
            OutputTool::flush_buffers(path.as_deref(), buffers)?;
            self.chunks_written += 1;
        }
        Ok(())
    }
}

impl IncomingInterface for RecordSink {
    fn init(&mut self, record_info: RecordInfo) -> Result<bool, OutputToolError> {
        if !matches!(self.state, SinkState::Uninitialized) {
            return Err(OutputToolError::Lifecycle(format!(
                "record layout received while {:?}",
                self.phase()
            )));
        }

        for issue in validate_output_path(self.handle.file_path().as_deref()) {
            warn!(tool_id = self.handle.tool_id(), "{}", issue);
            self.handle.message(MessageType::Error, &issue.to_string());
        }

        debug!(
            tool_id = self.handle.tool_id(),
            fields = record_info.num_fields(),
            "accumulating records"
        );
        let buffers = ColumnBuffers::from_record_info(&record_info);
        self.state = SinkState::Accumulating {
            record_info,
            buffers,
        };
        Ok(true)
    }

    fn push_record(&mut self, record: &Record) -> Result<bool, OutputToolError> {
        let phase = self.phase();
        let pending = match &mut self.state {
            SinkState::Accumulating {
                record_info,
                buffers,
            } => {
                buffers.push_record(record_info, record);
                buffers.pending_rows()
            }
            _ => {
                return Err(OutputToolError::Lifecycle(format!(
                    "record received while {:?}",
                    phase
                )))
            }
        };
        self.total_rows += 1;

        if pending >= self.handle.flush_threshold {
            self.flush()?;
        }
        Ok(true)
    }

    fn update_progress(&mut self, fraction: f64) {
        self.handle
            .engine
            .output_tool_progress(self.handle.tool_id(), fraction);
    }

    fn close(&mut self) -> Result<(), OutputToolError> {
        if !matches!(self.state, SinkState::Accumulating { .. }) {
            return Err(OutputToolError::Lifecycle(format!(
                "close received while {:?}",
                self.phase()
            )));
        }

        if self.pending_rows() > 0 {
            self.flush()?;
        }
        self.state = SinkState::Closed;

        info!(
            tool_id = self.handle.tool_id(),
            rows = self.total_rows,
            chunks = self.chunks_written,
            "input closed"
        );

        if let Some(path) = self.handle.file_path() {
            self.handle.message(
                MessageType::FileOutput,
                &format!("{}|{} was created.", path, path),
            );
        }
        Ok(())
    }
}
