//! Integration tests for the stand-alone host

use csv_output_tool::cli::Args;
use csv_output_tool::error::OutputToolError;
use csv_output_tool::host::{MessageLog, MessageType};
use csv_output_tool::runner::{run, RunSummary};

use clap::Parser;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

/// Helper: parse arguments the way the binary does
fn parse(args: &[&str]) -> Args {
    let mut argv = vec!["csv-output-tool"];
    argv.extend_from_slice(args);
    let args = Args::try_parse_from(argv).expect("Failed to parse args");
    args.validate().expect("Invalid argument combination");
    args
}

fn write_source(path: &Path, rows: usize) {
    let mut content = String::from("id,city,note\n");
    for i in 0..rows {
        content.push_str(&format!("{},City {},\"a, b\"\n", i, i % 7));
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_run_copies_source_rows_in_chunks() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.csv");
    let output = dir.path().join("copy.csv");
    write_source(&source, 25);

    let args = parse(&[
        "--input",
        source.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--chunk-size",
        "10",
    ]);
    let engine = Rc::new(MessageLog::new());
    let summary = run(&args, engine.clone()).unwrap();

    assert_eq!(summary, RunSummary { rows: 25, chunks: 3 });

    let mut original = csv::Reader::from_path(&source).unwrap();
    let mut copied = csv::Reader::from_path(&output).unwrap();
    assert_eq!(original.headers().unwrap(), copied.headers().unwrap());
    let original_rows: Vec<csv::StringRecord> = original.records().map(|r| r.unwrap()).collect();
    let copied_rows: Vec<csv::StringRecord> = copied.records().map(|r| r.unwrap()).collect();
    assert_eq!(original_rows, copied_rows);

    assert_eq!(engine.texts_of(MessageType::FileOutput).len(), 1);
    assert_eq!(engine.progress().last(), Some(&1.0));
}

#[test]
fn test_run_with_config_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.csv");
    let output = dir.path().join("from_config.csv");
    let config = dir.path().join("tool.xml");
    write_source(&source, 3);
    std::fs::write(
        &config,
        format!(
            "<Configuration>\n  <fileOutputPath>{}</fileOutputPath>\n</Configuration>\n",
            output.to_str().unwrap()
        ),
    )
    .unwrap();

    let args = parse(&[
        "--input",
        source.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--no-progress",
    ]);
    let engine = Rc::new(MessageLog::new());
    let summary = run(&args, engine.clone()).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(std::fs::read_to_string(&output).unwrap().lines().count(), 4);
    assert!(engine.progress().is_empty());
}

#[test]
fn test_run_without_input_reports_missing_connection() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.csv");

    let args = parse(&["--output", output.to_str().unwrap()]);
    let engine = Rc::new(MessageLog::new());
    let result = run(&args, engine.clone());

    assert!(matches!(result, Err(OutputToolError::InvalidArgument(_))));
    assert!(engine
        .errors()
        .contains(&"Missing Incoming Connection".to_string()));
    assert!(!output.exists());
}

#[test]
fn test_run_with_missing_source_is_io_error() {
    let dir = tempdir().unwrap();
    let args = parse(&[
        "--input",
        dir.path().join("absent.csv").to_str().unwrap(),
        "--output",
        dir.path().join("out.csv").to_str().unwrap(),
    ]);

    let result = run(&args, Rc::new(MessageLog::new()));
    assert!(matches!(result, Err(OutputToolError::Io(_))));
}

#[test]
fn test_run_with_bad_config_file_fails() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.csv");
    let config = dir.path().join("tool.xml");
    write_source(&source, 1);
    std::fs::write(&config, "<Configuration><Other/></Configuration>").unwrap();

    let args = parse(&[
        "--input",
        source.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    let engine = Rc::new(MessageLog::new());
    let result = run(&args, engine.clone());

    assert!(matches!(result, Err(OutputToolError::InvalidConfig(_))));
    assert!(engine.errors()[0].starts_with("Invalid XML: "));
}
