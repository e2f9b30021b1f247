//! CSV Output Tool - run the output tool outside the workflow engine
//!
//! Reads a source CSV, pushes its rows through the tool's host callbacks and
//! writes them to the configured output file in chunks. Engine messages are
//! printed through `tracing`; set `RUST_LOG` to change verbosity.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O or CSV error |
//! | 4 | Runtime error (callback out of order) |

use clap::Parser;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use csv_output_tool::cli::Args;
use csv_output_tool::error::OutputToolError;
use csv_output_tool::host::TracingEngine;
use csv_output_tool::runner;

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for runtime errors
const EXIT_RUNTIME_ERROR: u8 = 4;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match runner::run(&args, Rc::new(TracingEngine)) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Maps an error to the process exit code.
fn error_to_exit_code(error: &OutputToolError) -> u8 {
    match error {
        OutputToolError::InvalidConfig(_) => EXIT_CONFIG_ERROR,
        OutputToolError::Xml(_) => EXIT_CONFIG_ERROR,
        OutputToolError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        OutputToolError::MissingOutputPath => EXIT_CONFIG_ERROR,
        OutputToolError::Io(_) => EXIT_IO_ERROR,
        OutputToolError::Csv(_) => EXIT_IO_ERROR,
        OutputToolError::Lifecycle(_) => EXIT_RUNTIME_ERROR,
    }
}
