//! Host engine contract
//!
//! The workflow engine loads the tool and drives it through two callback
//! surfaces:
//!
//! - [`Plugin`]: five tool-level operations (configure, connect input,
//!   connect output, run without input, finish)
//! - [`IncomingInterface`]: four per-connection operations (metadata, record,
//!   progress, close)
//!
//! Outbound traffic goes through the [`Engine`] trait: status messages and
//! progress fractions, both tagged with the tool id. Calls are serialized by
//! the host, so engines are shared through `Rc` and use interior mutability
//! where they need state.

use std::cell::RefCell;

use crate::error::OutputToolError;

/// Severity/kind of a message sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Shown to the user as an error.
    Error,
    /// Shown to the user as a warning.
    Warning,
    /// Informational.
    Info,
    /// Announces a written file. The message is `<path>|<display text>`.
    FileOutput,
}

/// Outbound channel from the tool to the host engine.
pub trait Engine {
    /// Sends a status message attributed to `tool_id`.
    fn output_message(&self, tool_id: u32, kind: MessageType, message: &str);

    /// Reports completion of `tool_id` as a fraction in `0.0..=1.0`.
    fn output_tool_progress(&self, tool_id: u32, fraction: f64);
}

/// Localization hook for user-facing strings.
///
/// Strings pass through unchanged until translations exist.
pub fn xmsg(text: &str) -> String {
    text.to_string()
}

/// A single field in the incoming record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Record layout of an incoming connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInfo {
    fields: Vec<Field>,
}

impl RecordInfo {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Builds a layout from field names in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(Field::new).collect(),
        }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the string value of field `index` in `record`.
    ///
    /// `None` when the value is null or the record is shorter than the layout.
    pub fn get_as_string<'a>(&self, record: &'a Record, index: usize) -> Option<&'a str> {
        record.values.get(index).and_then(|value| value.as_deref())
    }
}

/// One row of incoming data. `None` marks a null value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Builds a record with no null values.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }
}

/// Tool-level callbacks invoked by the host.
pub trait Plugin {
    /// Handler returned for each incoming connection.
    type Incoming: IncomingInterface;

    /// Receives the tool configuration XML.
    fn init(&mut self, config_xml: &str) -> Result<(), OutputToolError>;

    /// Called when the host attaches an upstream connection.
    fn add_incoming_connection(&mut self, connection_type: &str, connection_name: &str)
        -> Self::Incoming;

    /// Called when the host attaches a downstream connection. `true` accepts it.
    fn add_outgoing_connection(&mut self, connection_name: &str) -> bool;

    /// Called for tools with no upstream connection.
    ///
    /// `record_limit` < 0 means no limit, 0 means no records.
    fn push_all_records(&mut self, record_limit: i64) -> bool;

    /// Called once all connections are done.
    fn close(&mut self, has_errors: bool);
}

/// Per-connection callbacks invoked by the host.
pub trait IncomingInterface {
    /// Receives the record layout of the connection.
    fn init(&mut self, record_info: RecordInfo) -> Result<bool, OutputToolError>;

    /// Receives one record. `true` means the record was accepted.
    fn push_record(&mut self, record: &Record) -> Result<bool, OutputToolError>;

    /// Upstream progress in `0.0..=1.0`.
    fn update_progress(&mut self, fraction: f64);

    /// Called after the last record.
    fn close(&mut self) -> Result<(), OutputToolError>;
}

/// A message captured by [`MessageLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedMessage {
    pub tool_id: u32,
    pub kind: MessageType,
    pub text: String,
}

/// Engine that keeps every message and progress update in memory.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<LoggedMessage>>,
    progress: RefCell<Vec<f64>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<LoggedMessage> {
        self.messages.borrow().clone()
    }

    /// Texts of all messages of the given kind, in arrival order.
    pub fn texts_of(&self, kind: MessageType) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.texts_of(MessageType::Error)
    }

    pub fn progress(&self) -> Vec<f64> {
        self.progress.borrow().clone()
    }
}

impl Engine for MessageLog {
    fn output_message(&self, tool_id: u32, kind: MessageType, message: &str) {
        self.messages.borrow_mut().push(LoggedMessage {
            tool_id,
            kind,
            text: message.to_string(),
        });
    }

    fn output_tool_progress(&self, _tool_id: u32, fraction: f64) {
        self.progress.borrow_mut().push(fraction);
    }
}

/// Engine that forwards messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEngine;

impl Engine for TracingEngine {
    fn output_message(&self, tool_id: u32, kind: MessageType, message: &str) {
        match kind {
            MessageType::Error => tracing::error!(tool_id, "{}", message),
            MessageType::Warning => tracing::warn!(tool_id, "{}", message),
            MessageType::Info => tracing::info!(tool_id, "{}", message),
            MessageType::FileOutput => {
                // Host convention: the display text follows the path.
                let shown = message.split_once('|').map_or(message, |(_, text)| text);
                tracing::info!(tool_id, "{}", shown);
            }
        }
    }

    fn output_tool_progress(&self, tool_id: u32, fraction: f64) {
        tracing::debug!(tool_id, progress = fraction, "progress");
    }
}
