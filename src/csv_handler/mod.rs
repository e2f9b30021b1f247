//! CSV handler module
//!
//! Buffers incoming column values and appends them to CSV files in chunks,
//! and reads source CSV files for the command-line host.

pub mod buffers;
pub mod reader;
pub mod writer;

pub use buffers::ColumnBuffers;
pub use reader::SourceReader;
pub use writer::{append_columns, WriteStats};
