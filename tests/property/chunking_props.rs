//! Property-based tests for chunked CSV output
//!
//! Whatever the chunk size and row count, the output holds one header row
//! followed by every record in order, with nulls written as empty strings.

use proptest::prelude::*;
use std::rc::Rc;
use tempfile::tempdir;

use csv_output_tool::config::ToolConfig;
use csv_output_tool::host::{IncomingInterface, MessageLog, Plugin, Record, RecordInfo};
use csv_output_tool::plugin::OutputTool;

/// Strategy for a single field value, including nulls and CSV special characters
fn value_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => "[a-zA-Z0-9 ]{0,12}".prop_map(Some),
        1 => "[a-z]{0,4}[,\"\n][a-z]{0,4}".prop_map(Some),
        1 => Just(None),
    ]
}

/// Strategy for rows over three fields
fn rows_strategy() -> impl Strategy<Value = Vec<Vec<Option<String>>>> {
    prop::collection::vec(prop::collection::vec(value_strategy(), 3), 0..60)
}

proptest! {
    #[test]
    fn prop_all_rows_written_once_with_single_header(
        rows in rows_strategy(),
        threshold in 1usize..20,
    ) {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("out.csv");

        let engine = Rc::new(MessageLog::new());
        let mut tool = OutputTool::new(1, engine.clone()).with_flush_threshold(threshold);
        tool.init(&ToolConfig::with_path(csv_path.to_str().unwrap()).to_xml()).unwrap();
        let mut sink = tool.add_incoming_connection("Input", "#1");
        sink.init(RecordInfo::from_names(["a", "b", "c"])).unwrap();

        for row in &rows {
            prop_assert!(sink.push_record(&Record::new(row.clone())).unwrap());
        }
        let flushed_before_close = sink.chunks_written();
        prop_assert_eq!(flushed_before_close as usize, rows.len() / threshold);
        sink.close().unwrap();

        let expected_chunks = rows.len().div_ceil(threshold);
        prop_assert_eq!(sink.chunks_written() as usize, expected_chunks);

        if rows.is_empty() {
            prop_assert!(!csv_path.exists());
            return Ok(());
        }

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        prop_assert_eq!(headers, vec!["a", "b", "c"]);

        let written: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|v| v.clone().unwrap_or_default()).collect())
            .collect();
        prop_assert_eq!(written, expected);
    }
}
