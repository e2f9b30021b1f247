//! CSV Output Tool Library
//!
//! An output tool for a workflow engine: the host streams records into the
//! tool, which buffers them by column and appends them to a CSV file in
//! fixed-size chunks. It includes modules for the host callback contract,
//! tool configuration, output path validation, CSV buffering and writing,
//! and the command-line host used to run the tool outside the engine.

pub mod cli;
pub mod config;
pub mod csv_handler;
pub mod error;
pub mod host;
pub mod plugin;
pub mod runner;
pub mod sink;
pub mod validator;
