// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for logscrape-console
//!
//! These tests scan recorded Jenkins console transcripts end to end.

use logscrape_console::matcher::is_timestamp_line;
use logscrape_console::{ConsoleScanner, Matcher, failed_test_name};
use proptest::prelude::*;
use similar_asserts::assert_eq;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Get the fixtures directory for test data
fn fixtures_dir() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read {name} fixture: {e}"))
}

#[test]
fn test_scan_sample_console() {
    let content = read_fixture("console-sample.txt");
    let scan = ConsoleScanner::scan_lines(content.lines());

    assert_eq!(
        scan.record.timestamp.as_deref(),
        Some("Wed Oct 14 02:00:13 PDT 2026")
    );
    assert_eq!(scan.record.node_name.as_deref(), Some("mr-0xd7"));
    assert_eq!(scan.record.build_id.as_deref(), Some("1873"));
    assert_eq!(
        scan.record.git_hash.as_deref(),
        Some("9c1f0e2b7a44d8e6c2f3a1b5d9e8f7a6b5c4d3e2")
    );
    assert_eq!(scan.record.git_branch.as_deref(), Some("(origin/master)"));
    assert!(!scan.record.build_timeout);
    // "Finished: FAILURE" is explained by the failed tests
    assert!(!scan.record.build_failure);
    assert!(scan.failure_occurred);
    assert_eq!(scan.stopped_by, None);
    assert_eq!(scan.lines_scanned, 25);

    assert_eq!(
        scan.failed_tests.names(),
        &["pyunit_gbm_weights.py", "pyunit_rf_offset.py"]
    );
    assert_eq!(scan.java_logs.len(), 2);
    assert!(scan.java_logs[1].ends_with("results/java_1_0.out.txt"));
}

#[test]
fn test_scan_timeout_console() {
    let file = File::open(fixtures_dir().join("console-timeout.txt")).expect("open fixture");
    let scan = ConsoleScanner::scan_reader(BufReader::new(file)).expect("Should scan");

    assert!(scan.record.build_timeout);
    assert!(!scan.record.build_failure);
    assert_eq!(scan.stopped_by, Some(Matcher::BuildTimeout));
    assert_eq!(scan.lines_scanned, 7);

    // Everything after the timeout line is ignored
    assert_eq!(scan.failed_tests.names(), &["runit_glm_lambda.R"]);
    assert_eq!(scan.java_logs.len(), 1);
    assert!(scan.java_logs[0].ends_with("java_0_0.out.txt"));
}

#[test]
fn test_scan_is_deterministic() {
    let content = read_fixture("console-sample.txt");
    let first = ConsoleScanner::scan_lines(content.lines());
    let second = ConsoleScanner::scan_lines(content.lines());
    assert_eq!(first, second);

    let json_first = serde_json::to_string(&first).expect("serialize");
    let json_second = serde_json::to_string(&second).expect("serialize");
    assert_eq!(json_first, json_second);
}

#[test]
fn test_empty_console() {
    let scan = ConsoleScanner::scan_lines(Vec::<String>::new());
    assert_eq!(scan.lines_scanned, 0);
    assert!(!scan.failure_occurred);
    assert!(scan.record.build_id.is_none());
}

/// Arbitrary console-ish lines, including the markers the matchers look for
fn console_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Build id is 1".to_string()),
        Just("Build id is 2".to_string()),
        Just("Building remotely on node-a in workspace /w".to_string()),
        Just("Building remotely on node-b in workspace /w".to_string()),
        Just("Checking out Revision aaa (origin/x)".to_string()),
        Just("Checking out Revision bbb (origin/y)".to_string()),
        Just("Mon Jan 5 10:00:00 UTC 2026".to_string()),
        Just("Tue Feb 6 11:00:00 UTC 2026".to_string()),
        Just("FAIL suite 0 test_case 1.0".to_string()),
        Just("H2O Cloud 1 Node 0 started with output file /a/java_0.out.txt".to_string()),
        "[a-zA-Z0-9 :./()-]{0,60}",
    ]
}

proptest! {
    #[test]
    fn prop_fields_are_written_once(lines in prop::collection::vec(console_line(), 0..40)) {
        let scan = ConsoleScanner::scan_lines(&lines);
        let seen = &lines[..scan.lines_scanned];

        let first_build_id = seen
            .iter()
            .find_map(|l| l.strip_prefix("Build id is ").map(str::trim))
            .filter(|id| !id.is_empty());
        if let Some(id) = first_build_id {
            prop_assert_eq!(scan.record.build_id.as_deref(), Some(id));
        }

        let first_node = seen
            .iter()
            .find_map(|l| l.strip_prefix("Building remotely on "))
            .and_then(|rest| rest.split_whitespace().next());
        if let Some(node) = first_node {
            prop_assert_eq!(scan.record.node_name.as_deref(), Some(node));
        }

        let first_timestamp = seen.iter().map(|l| l.trim()).find(|l| is_timestamp_line(l));
        prop_assert_eq!(scan.record.timestamp.as_deref(), first_timestamp);

        let first_revision = seen
            .iter()
            .filter_map(|l| l.split_once("Checking out Revision"))
            .map(|(_, rest)| rest.split_whitespace().collect::<Vec<_>>())
            .find(|tokens| tokens.len() >= 2);
        if let Some(tokens) = first_revision {
            prop_assert_eq!(scan.record.git_hash.as_deref(), Some(tokens[0]));
            prop_assert_eq!(scan.record.git_branch.as_deref(), Some(tokens[1]));
        }
    }

    #[test]
    fn prop_failed_registry_matches_heuristic(
        lines in prop::collection::vec(console_line(), 0..40)
    ) {
        let scan = ConsoleScanner::scan_lines(&lines);
        let seen = &lines[..scan.lines_scanned];

        for name in scan.failed_tests.iter() {
            prop_assert!(seen.iter().any(|l| failed_test_name(l) == Some(name)));
        }
        for line in seen {
            if let Some(name) = failed_test_name(line) {
                prop_assert!(scan.failed_tests.contains(name));
            }
        }
    }

    #[test]
    fn prop_scanner_never_panics(input in "(?s).{0,400}") {
        let _ = ConsoleScanner::scan_lines(input.lines());
    }
}
