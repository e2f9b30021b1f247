//! Plugin controller
//!
//! [`OutputTool`] is the object the host creates for each instance of the
//! tool on a workflow canvas. It holds the configured output path and hands
//! out one [`RecordSink`] per incoming connection; the sinks do the actual
//! buffering and writing.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use csv_output_tool::host::{IncomingInterface, MessageLog, Plugin, Record, RecordInfo};
//! use csv_output_tool::plugin::OutputTool;
//!
//! let engine = Rc::new(MessageLog::new());
//! let mut tool = OutputTool::new(1, engine.clone());
//! tool.init("<Configuration><fileOutputPath>out.csv</fileOutputPath></Configuration>")?;
//!
//! let mut sink = tool.add_incoming_connection("Input", "wire");
//! sink.init(RecordInfo::from_names(["id", "name"]))?;
//! sink.push_record(&Record::from_strings(["1", "Ann"]))?;
//! sink.close()?;
//! tool.close(false);
//! # Ok::<(), csv_output_tool::error::OutputToolError>(())
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::config::ToolConfig;
use crate::csv_handler::{append_columns, ColumnBuffers, WriteStats};
use crate::error::OutputToolError;
use crate::host::{xmsg, Engine, MessageType, Plugin};
use crate::sink::RecordSink;

/// Rows accumulated before a chunk is appended to the output file.
pub const FLUSH_THRESHOLD: usize = 1_000_000;

/// What a sink needs from its controller: identity, engine and output path.
///
/// Cloned into each sink when the connection is added. The output path is
/// shared with the controller and read at the time of use, so a sink created
/// before the configuration arrives still sees it.
#[derive(Clone)]
pub struct ToolHandle {
    pub(crate) tool_id: u32,
    pub(crate) engine: Rc<dyn Engine>,
    pub(crate) file_path: Rc<RefCell<Option<String>>>,
    pub(crate) flush_threshold: usize,
}

impl ToolHandle {
    pub fn tool_id(&self) -> u32 {
        self.tool_id
    }

    /// The configured output path, if any.
    pub fn file_path(&self) -> Option<String> {
        self.file_path.borrow().clone()
    }

    pub(crate) fn message(&self, kind: MessageType, text: &str) {
        self.engine.output_message(self.tool_id, kind, &xmsg(text));
    }
}

/// Output tool controller.
pub struct OutputTool {
    handle: ToolHandle,
    name: String,
}

impl OutputTool {
    /// Creates an unconfigured tool instance.
    pub fn new(tool_id: u32, engine: Rc<dyn Engine>) -> Self {
        Self {
            handle: ToolHandle {
                tool_id,
                engine,
                file_path: Rc::new(RefCell::new(None)),
                flush_threshold: FLUSH_THRESHOLD,
            },
            name: format!("CsvOutputTool_{}", tool_id),
        }
    }

    /// Overrides the number of rows per chunk. Values below 1 are raised to 1.
    pub fn with_flush_threshold(mut self, rows: usize) -> Self {
        self.handle.flush_threshold = rows.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_path(&self) -> Option<String> {
        self.handle.file_path()
    }

    pub fn flush_threshold(&self) -> usize {
        self.handle.flush_threshold
    }

    /// Applies an already parsed configuration.
    pub fn configure(&mut self, config: &ToolConfig) {
        *self.handle.file_path.borrow_mut() = config.file_output_path().map(str::to_string);
    }

    /// Appends the buffered rows to the file at `path` and clears the buffers.
    ///
    /// Fails with [`OutputToolError::MissingOutputPath`] if no path is set.
    pub fn flush_buffers(
        path: Option<&str>,
        buffers: &mut ColumnBuffers,
    ) -> Result<WriteStats, OutputToolError> {
        let path = path.ok_or(OutputToolError::MissingOutputPath)?;
        let stats = append_columns(Path::new(path), buffers)?;
        debug!(
            path,
            rows = stats.rows_written,
            header = stats.wrote_header,
            "appended chunk"
        );
        Ok(stats)
    }
}

impl Plugin for OutputTool {
    type Incoming = RecordSink;

    fn init(&mut self, config_xml: &str) -> Result<(), OutputToolError> {
        match ToolConfig::from_xml(config_xml) {
            Ok(config) => {
                self.configure(&config);
                debug!(tool = %self.name, path = ?self.handle.file_path(), "configured");
                Ok(())
            }
            Err(e) => {
                self.handle
                    .message(MessageType::Error, &format!("Invalid XML: {}", config_xml));
                Err(e)
            }
        }
    }

    fn add_incoming_connection(
        &mut self,
        connection_type: &str,
        connection_name: &str,
    ) -> RecordSink {
        debug!(
            tool = %self.name,
            connection_type, connection_name, "incoming connection"
        );
        RecordSink::new(self.handle.clone())
    }

    fn add_outgoing_connection(&mut self, _connection_name: &str) -> bool {
        true
    }

    fn push_all_records(&mut self, _record_limit: i64) -> bool {
        self.handle
            .message(MessageType::Error, "Missing Incoming Connection");
        false
    }

    fn close(&mut self, has_errors: bool) {
        debug!(tool = %self.name, has_errors, "tool closed");
    }
}
