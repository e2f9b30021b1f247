//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros for the
//! stand-alone host, which feeds a source CSV through the output tool the
//! same way the workflow engine would.

use clap::Parser;
use std::path::PathBuf;

use crate::plugin::FLUSH_THRESHOLD;

/// Command-line arguments for the CSV output tool host.
///
/// Use the `validate()` method after parsing to ensure argument combinations
/// are valid.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use csv_output_tool::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "csv-output-tool")]
#[command(about = "Stream records from a source CSV through the CSV output tool")]
#[command(version)]
pub struct Args {
    /// Source CSV whose rows are pushed into the tool (omit to run without input)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Tool configuration XML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output path (alternative to --config)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Tool id attached to every engine message
    #[arg(long, default_value = "1")]
    pub tool_id: u32,

    /// Rows buffered before each append to the output file
    #[arg(long, default_value_t = FLUSH_THRESHOLD)]
    pub chunk_size: usize,

    /// Do not report progress
    #[arg(long, default_value = "false")]
    pub no_progress: bool,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// - exactly one of `--config` and `--output` is required
    /// - `--chunk-size` must be at least 1
    pub fn validate(&self) -> Result<(), String> {
        match (&self.config, &self.output) {
            (None, None) => return Err("one of --config or --output is required".to_string()),
            (Some(_), Some(_)) => {
                return Err("--config cannot be used with --output".to_string())
            }
            _ => {}
        }

        if self.chunk_size == 0 {
            return Err("--chunk-size must be at least 1".to_string());
        }

        Ok(())
    }
}
