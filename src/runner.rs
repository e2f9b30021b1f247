//! Stand-alone host
//!
//! Drives an [`OutputTool`] through the same callback sequence the workflow
//! engine uses, with records taken from a source CSV:
//!
//! 1. `init` with the configuration XML
//! 2. `add_outgoing_connection`
//! 3. `add_incoming_connection`, then the sink's `init` with the header layout
//! 4. `push_record` for every row, with periodic `update_progress`
//! 5. the sink's `close`, then the tool's `close`
//!
//! Without a source file the tool is asked to `push_all_records`, which it
//! refuses.

use std::fs;
use std::rc::Rc;

use tracing::info;

use crate::cli::Args;
use crate::config::ToolConfig;
use crate::csv_handler::SourceReader;
use crate::error::OutputToolError;
use crate::host::{Engine, IncomingInterface, Plugin};
use crate::plugin::OutputTool;

/// Rows between progress reports.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records pushed into the tool.
    pub rows: u64,
    /// Appends made to the output file.
    pub chunks: u64,
}

/// Builds the configuration XML from `--config` or `--output`.
fn load_config_xml(args: &Args) -> Result<String, OutputToolError> {
    match (&args.config, &args.output) {
        (Some(path), _) => Ok(fs::read_to_string(path)?),
        (None, Some(output)) => Ok(ToolConfig::with_path(output.as_str()).to_xml()),
        (None, None) => Err(OutputToolError::InvalidArgument(
            "one of --config or --output is required".to_string(),
        )),
    }
}

/// Runs the tool over the source CSV named in `args`.
pub fn run(args: &Args, engine: Rc<dyn Engine>) -> Result<RunSummary, OutputToolError> {
    let mut tool = OutputTool::new(args.tool_id, engine).with_flush_threshold(args.chunk_size);

    tool.init(&load_config_xml(args)?)?;
    tool.add_outgoing_connection("Output");

    let result = match &args.input {
        Some(_) => stream_input(args, &mut tool),
        None => {
            tool.push_all_records(-1);
            Err(OutputToolError::InvalidArgument(
                "Missing Incoming Connection".to_string(),
            ))
        }
    };

    tool.close(result.is_err());
    result
}

fn stream_input(args: &Args, tool: &mut OutputTool) -> Result<RunSummary, OutputToolError> {
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| OutputToolError::InvalidArgument("--input is required".to_string()))?;

    let mut reader = SourceReader::new(input)?;
    let mut sink = tool.add_incoming_connection("Input", &input.display().to_string());
    sink.init(reader.record_info().clone())?;

    while let Some(record) = reader.read_next() {
        sink.push_record(&record?)?;
        if !args.no_progress && sink.total_rows() % PROGRESS_INTERVAL == 0 {
            sink.update_progress(reader.progress());
        }
    }
    if !args.no_progress {
        sink.update_progress(1.0);
    }
    sink.close()?;

    let summary = RunSummary {
        rows: sink.total_rows(),
        chunks: sink.chunks_written(),
    };
    info!(rows = summary.rows, chunks = summary.chunks, "run complete");
    Ok(summary)
}
