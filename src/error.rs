//! Error module
//!
//! Defines the error type for the CSV output tool using `thiserror`.
//! Every fallible operation in the crate returns [`OutputToolError`], with
//! `From` conversions for the underlying CSV, I/O and XML errors.

use thiserror::Error;

/// The main error type for the CSV output tool.
///
/// # Error Categories
///
/// - **Configuration errors**: malformed tool XML or bad command-line arguments
/// - **File I/O errors**: failures while appending a chunk to the output file
/// - **Lifecycle errors**: the host invoked a callback out of order
///
/// Path-validation findings are not errors; they are reported through the
/// engine and never abort the stream.
#[derive(Error, Debug)]
pub enum OutputToolError {
    /// The tool configuration payload could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration XML is not well-formed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing or reading CSV data failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffered rows had to be written but no output path was configured.
    #[error("No output path configured")]
    MissingOutputPath,

    /// A host callback arrived in a state that does not accept it.
    ///
    /// The sink moves `Uninitialized -> Accumulating -> Closed` and never back.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
