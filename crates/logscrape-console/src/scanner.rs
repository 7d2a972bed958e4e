// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Console scan driver
//!
//! [`ConsoleScanner`] walks the console transcript once. For every line it
//! first asks the failed-test registrar, then consults each still active
//! [`Matcher`] in registration order. Matchers that report
//! [`Status::Done`] are retired after the line; a [`Flow::Stop`] from any
//! matcher ends the scan and every later line is ignored.
//!
//! Java output logs announced after a stop are therefore never collected.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConsoleError;
use crate::matcher::{Flow, Matcher, Status};
use crate::record::BuildRecord;
use crate::registrar::FailedTests;

/// Everything learned from one console transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleScan {
    /// Build metadata
    pub record: BuildRecord,
    /// Failed tests in the order they were reported
    pub failed_tests: FailedTests,
    /// Paths of per-node Java output logs, in console order
    pub java_logs: Vec<String>,
    /// A test failure, build failure or timeout was seen
    pub failure_occurred: bool,
    /// Matcher that ended the scan early, if any
    #[serde(skip)]
    pub stopped_by: Option<Matcher>,
    /// Number of lines inspected before the scan ended
    pub lines_scanned: usize,
}

/// Single-pass console scanner
#[derive(Debug, Clone)]
pub struct ConsoleScanner {
    scan: ConsoleScan,
    active: Vec<Matcher>,
}

impl ConsoleScanner {
    /// Create a scanner with every matcher active
    #[must_use]
    pub fn new() -> Self {
        Self::with_record(BuildRecord::new())
    }

    /// Create a scanner that writes into a pre-seeded record
    ///
    /// Fields already present in `record` are never overwritten.
    #[must_use]
    pub fn with_record(record: BuildRecord) -> Self {
        Self {
            scan: ConsoleScan {
                record,
                ..ConsoleScan::default()
            },
            active: Matcher::REGISTRATION_ORDER.to_vec(),
        }
    }

    /// Scan a complete sequence of lines
    pub fn scan_lines<I, S>(lines: I) -> ConsoleScan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = Self::new();
        for line in lines {
            if scanner.process_line(line.as_ref()) == Flow::Stop {
                break;
            }
        }
        scanner.finish()
    }

    /// Scan a console transcript from a reader
    ///
    /// Reading stops as soon as the scan stops.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Io` if the reader fails.
    pub fn scan_reader<R: BufRead>(reader: R) -> Result<ConsoleScan, ConsoleError> {
        let mut scanner = Self::new();
        for line in reader.lines() {
            if scanner.process_line(&line?) == Flow::Stop {
                break;
            }
        }
        Ok(scanner.finish())
    }

    /// Process a single console line
    pub fn process_line(&mut self, line: &str) -> Flow {
        if self.is_stopped() {
            return Flow::Stop;
        }
        self.scan.lines_scanned += 1;

        if self.scan.failed_tests.register_line(line).is_some() {
            self.scan.failure_occurred = true;
        }

        let mut retired = Vec::new();
        let mut flow = Flow::Continue;
        for &matcher in &self.active {
            let outcome = matcher.inspect(line, &mut self.scan);
            if outcome.status == Status::Done {
                retired.push(matcher);
            }
            if outcome.flow == Flow::Stop {
                info!(
                    matcher = matcher.name(),
                    line = self.scan.lines_scanned,
                    "console scan stopped early"
                );
                self.scan.stopped_by = Some(matcher);
                flow = Flow::Stop;
                break;
            }
        }

        if !retired.is_empty() {
            debug!(?retired, "retiring satisfied matchers");
            self.active.retain(|m| !retired.contains(m));
        }
        flow
    }

    /// Whether a terminal line has been seen
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.scan.stopped_by.is_some()
    }

    /// Matchers still consulted on every line
    #[must_use]
    pub fn active_matchers(&self) -> &[Matcher] {
        &self.active
    }

    /// Results gathered so far
    #[must_use]
    pub fn scan(&self) -> &ConsoleScan {
        &self.scan
    }

    /// Finish scanning and return the results
    #[must_use]
    pub fn finish(self) -> ConsoleScan {
        debug!(
            lines = self.scan.lines_scanned,
            failed_tests = self.scan.failed_tests.len(),
            java_logs = self.scan.java_logs.len(),
            "console scan finished"
        );
        self.scan
    }
}

impl Default for ConsoleScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_matchers_retire_once_satisfied() {
        let mut scanner = ConsoleScanner::new();
        scanner.process_line("Build id is 12");
        assert!(!scanner.active_matchers().contains(&Matcher::BuildId));
        assert_eq!(scanner.active_matchers().len(), 6);

        scanner.process_line("Build id is 13");
        assert_eq!(scanner.scan().record.build_id.as_deref(), Some("12"));
    }

    #[test]
    fn test_collector_stays_active() {
        let scan = ConsoleScanner::scan_lines([
            "H2O Cloud 1 Node 0 started with output file /a/b/java_0_0.out.txt",
            "Build id is 4",
            "H2O Cloud 2 Node 1 started with output file /a/b/java_1_0.out.txt",
        ]);
        assert_eq!(
            scan.java_logs,
            vec![
                "/a/b/java_0_0.out.txt".to_string(),
                "/a/b/java_1_0.out.txt".to_string()
            ]
        );
    }

    #[test]
    fn test_timeout_truncates_scan() {
        let scan = ConsoleScanner::scan_lines([
            "Build id is 4",
            "Build timed out (after 60 minutes). Marking the build as failed.",
            "Building remotely on mr-0xb1 in workspace /ws",
            "FAIL a b test_late 3s",
        ]);
        assert!(scan.record.build_timeout);
        assert_eq!(scan.stopped_by, Some(Matcher::BuildTimeout));
        assert_eq!(scan.lines_scanned, 2);
        assert!(scan.record.node_name.is_none());
        assert!(scan.failed_tests.is_empty());
    }

    #[test]
    fn test_process_after_stop_is_ignored() {
        let mut scanner = ConsoleScanner::new();
        assert_eq!(scanner.process_line("BUILD FAILED"), Flow::Stop);
        assert_eq!(scanner.process_line("Build id is 9"), Flow::Stop);
        assert!(scanner.scan().record.build_id.is_none());
        assert_eq!(scanner.scan().lines_scanned, 1);
    }

    #[test]
    fn test_failed_tests_registered_before_failure_phrase() {
        let scan = ConsoleScanner::scan_lines([
            "FAIL pyunit a test_glm 12s",
            "Finished: FAILURE",
            "Build id is 77",
        ]);
        assert!(!scan.record.build_failure);
        assert!(scan.stopped_by.is_none());
        assert_eq!(scan.record.build_id.as_deref(), Some("77"));
        assert!(scan.failure_occurred);
    }

    #[test]
    fn test_later_matches_keep_first_values() {
        let mut scanner = ConsoleScanner::new();
        for line in [
            "Wed Oct 14 02:00:13 PDT 2026",
            "Checking out Revision 9c1f0e2b (origin/master)",
        ] {
            scanner.process_line(line);
        }
        // Retired matchers must not see the later lines
        assert!(!scanner.active_matchers().contains(&Matcher::Timestamp));
        assert!(!scanner.active_matchers().contains(&Matcher::GitRevision));
        for line in [
            "Thu Oct 15 02:41:09 PDT 2026",
            "Checking out Revision 4e5d6c7b (origin/rel-3)",
        ] {
            scanner.process_line(line);
        }

        let record = scanner.finish().record;
        assert_eq!(record.timestamp.as_deref(), Some("Wed Oct 14 02:00:13 PDT 2026"));
        assert_eq!(record.git_hash.as_deref(), Some("9c1f0e2b"));
        assert_eq!(record.git_branch.as_deref(), Some("(origin/master)"));
    }

    #[test]
    fn test_seeded_record_is_not_overwritten() {
        let mut scanner = ConsoleScanner::with_record(BuildRecord {
            node_name: Some("given".to_string()),
            ..BuildRecord::for_job("job")
        });
        scanner.process_line("Building remotely on mined in workspace /ws");
        let scan = scanner.finish();
        assert_eq!(scan.record.node_name.as_deref(), Some("given"));
        assert_eq!(scan.record.job_name.as_deref(), Some("job"));
    }

    #[test]
    fn test_scan_reader() {
        let input = "Build id is 5\nChecking out Revision abc123 (origin/rel-3)\n";
        let scan = ConsoleScanner::scan_reader(input.as_bytes()).expect("Should read");
        assert_eq!(scan.record.git_hash.as_deref(), Some("abc123"));
        assert_eq!(scan.lines_scanned, 2);
    }
}
