// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Java output log scanner
//!
//! The scanner is a small state machine over the lines of one log file. It
//! remembers which test is running and whether a bad-level message is still
//! collecting continuation lines. Every line goes through three steps:
//!
//! 1. A line containing [`TEST_START_MARKER`] closes the open message and the
//!    previous test's group, then makes the text after the marker the
//!    running test.
//! 2. A structured line (level token at [`LEVEL_TOKEN_INDEX`]) closes the
//!    open message. Any other line is appended verbatim to the open message.
//! 3. A bad-level line with text after its level token opens a new message.
//!
//! Closing a message runs it through the [`IgnoreSet`] and hands survivors
//! to the [`Associator`]. The end of the file closes whatever is still open.
//!
//! [`LEVEL_TOKEN_INDEX`]: crate::severity::LEVEL_TOKEN_INDEX

use std::io::BufRead;
use std::mem;

use tracing::{debug, trace};

use crate::associator::Associator;
use crate::error::JavaLogError;
use crate::ignore::IgnoreSet;
use crate::outcome::DiagnosticMessage;
use crate::severity::LogLevel;

/// Marker preceding the name of a test that starts running
pub const TEST_START_MARKER: &str = "STARTING TEST:";

/// Counters for one scanned log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JavaScanStats {
    /// Lines inspected
    pub lines: usize,
    /// Tests started in this file
    pub tests_started: usize,
    /// Messages that survived the ignore set
    pub reported: usize,
    /// Messages dropped by the ignore set
    pub ignored: usize,
}

/// Message still collecting continuation lines
#[derive(Debug, Clone)]
struct OpenMessage {
    severity: LogLevel,
    text: String,
}

/// Scanner for a single Java output log
pub struct JavaMessageScanner<'a> {
    ignore: &'a IgnoreSet,
    associator: &'a mut Associator,
    current_test: String,
    open: Option<OpenMessage>,
    group: Vec<DiagnosticMessage>,
    stats: JavaScanStats,
}

impl<'a> JavaMessageScanner<'a> {
    /// Create a scanner for one file
    ///
    /// No test is running at the start of a file.
    pub fn new(ignore: &'a IgnoreSet, associator: &'a mut Associator) -> Self {
        Self {
            ignore,
            associator,
            current_test: String::new(),
            open: None,
            group: Vec::new(),
            stats: JavaScanStats::default(),
        }
    }

    /// Scan a complete file given as lines
    pub fn scan_lines<I, S>(
        lines: I,
        ignore: &'a IgnoreSet,
        associator: &'a mut Associator,
    ) -> JavaScanStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = Self::new(ignore, associator);
        for line in lines {
            scanner.process_line(line.as_ref());
        }
        scanner.finish()
    }

    /// Scan a complete file from a reader
    ///
    /// # Errors
    ///
    /// Returns `JavaLogError::Io` if the reader fails. Messages flushed
    /// before the failure stay associated.
    pub fn scan_reader<R: BufRead>(
        reader: R,
        ignore: &'a IgnoreSet,
        associator: &'a mut Associator,
    ) -> Result<JavaScanStats, JavaLogError> {
        let mut scanner = Self::new(ignore, associator);
        for line in reader.lines() {
            scanner.process_line(&line?);
        }
        Ok(scanner.finish())
    }

    /// Process one log line
    pub fn process_line(&mut self, line: &str) {
        self.stats.lines += 1;

        if let Some((_, test_name)) = line.split_once(TEST_START_MARKER) {
            self.flush_message();
            self.finish_test();
            self.current_test = test_name.trim().to_string();
            self.stats.tests_started += 1;
            trace!(test = %self.current_test, "test started");
        }

        let level = LogLevel::of_line(line);
        match level {
            Some((level, _)) if level.is_structured() => self.flush_message(),
            _ => {
                if let Some(open) = self.open.as_mut() {
                    open.text.push_str(line);
                    open.text.push('\n');
                }
            }
        }

        if let Some((severity, text)) = level.filter(|(level, _)| level.is_bad()) {
            let text = text.trim();
            if !text.is_empty() {
                self.open = Some(OpenMessage {
                    severity,
                    text: format!("{text}\n"),
                });
            }
        }
    }

    /// Name of the running test, empty when none
    #[must_use]
    pub fn current_test(&self) -> &str {
        &self.current_test
    }

    /// Whether a message is still collecting continuation lines
    #[must_use]
    pub fn is_continuing(&self) -> bool {
        self.open.is_some()
    }

    /// Close everything still open and return the counters
    pub fn finish(mut self) -> JavaScanStats {
        self.flush_message();
        self.finish_test();
        debug!(
            lines = self.stats.lines,
            tests = self.stats.tests_started,
            reported = self.stats.reported,
            ignored = self.stats.ignored,
            "java log scanned"
        );
        self.stats
    }

    fn flush_message(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let message = DiagnosticMessage::new(open.severity, open.text);

        if self.ignore.is_ignored(&self.current_test, &message.message) {
            self.stats.ignored += 1;
            trace!(test = %self.current_test, "ignored known message");
            return;
        }

        self.stats.reported += 1;
        if self.current_test.is_empty() {
            self.associator.add_general(message);
        } else {
            self.group.push(message);
        }
    }

    fn finish_test(&mut self) {
        let group = mem::take(&mut self.group);
        if !self.current_test.is_empty() {
            self.associator.associate(&self.current_test, group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const PREFIX: &str = "10-14 02:13:55.123 10.0.0.7:54321 31337 main";

    fn line(level: &str, text: &str) -> String {
        format!("{PREFIX} {level} {text}")
    }

    fn start(test: &str) -> String {
        line("INFO:", &format!("STARTING TEST: {test}"))
    }

    #[test]
    fn test_multi_line_warning_is_one_message() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let lines = [
            start("test_leak"),
            line("WARN:", "leak detected"),
            "    at com.foo.Bar (Bar.java:10)".to_string(),
        ];

        let stats = JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        assert_eq!(stats.reported, 1);
        let passed = associator.passed();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].test_name, "test_leak");
        assert_eq!(
            passed[0].messages,
            vec![DiagnosticMessage::new(
                LogLevel::Warn,
                "leak detected\n    at com.foo.Bar (Bar.java:10)\n"
            )]
        );
    }

    #[test]
    fn test_general_ignore_applies_inside_tests() {
        let ignore =
            IgnoreSet::new().with_general(["leak detected\n    at com.foo.Bar (Bar.java:10)"]);
        let mut associator = Associator::default();
        let lines = [
            start("test_leak"),
            line("WARN:", "leak detected"),
            "    at com.foo.Bar (Bar.java:10)".to_string(),
        ];

        let stats = JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        assert_eq!(stats.ignored, 1);
        let associations = associator.finish();
        assert!(associations.passed.is_empty());
        assert!(associations.general.is_empty());
    }

    #[test]
    fn test_messages_without_test_are_general() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let lines = [
            line("ERRR:", "cloud formation slow"),
            line("INFO:", "cloud of size 1 formed"),
            line("FATAL:", "out of memory"),
        ];

        JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        let severities: Vec<LogLevel> = associator.general().iter().map(|m| m.severity).collect();
        assert_eq!(severities, vec![LogLevel::Error, LogLevel::Fatal]);
        assert_eq!(associator.general()[0].message, "cloud formation slow\n");
    }

    #[test]
    fn test_debug_and_info_are_never_reported() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let lines = [
            start("test_quiet"),
            line("INFO:", "all good"),
            line("DEBUG:", "details"),
            "   not a continuation of anything".to_string(),
        ];

        let stats = JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        assert_eq!(stats.reported, 0);
        assert!(associator.passed().is_empty());
    }

    #[test]
    fn test_structured_line_ends_continuation() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let lines = [
            start("test_a"),
            line("WARN:", "first"),
            "\tframe 1".to_string(),
            line("INFO:", "unrelated"),
            "\tframe 2".to_string(),
        ];

        JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        assert_eq!(associator.passed()[0].messages[0].message, "first\n\tframe 1\n");
        assert_eq!(associator.passed()[0].messages.len(), 1);
    }

    #[test]
    fn test_open_message_belongs_to_previous_test() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::new(["test_b"]);
        let lines = [
            start("test_a"),
            line("TRACE:", "stack dump"),
            "    at x.y.Z".to_string(),
            start("test_b"),
            line("ERRR:", "b broke"),
        ];

        JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        let associations = associator.finish();
        assert_eq!(associations.passed.len(), 1);
        assert_eq!(associations.passed[0].test_name, "test_a");
        assert_eq!(associations.passed[0].messages[0].message, "stack dump\n    at x.y.Z\n");
        assert_eq!(associations.failed[0].messages.len(), 1);
        assert_eq!(associations.failed[0].messages[0].severity, LogLevel::Error);
    }

    #[test]
    fn test_bad_level_without_text_opens_nothing() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let mut scanner = JavaMessageScanner::new(&ignore, &mut associator);
        scanner.process_line(&line("WARN:", "   "));
        assert!(!scanner.is_continuing());
        scanner.process_line("dangling");
        let stats = scanner.finish();
        assert_eq!(stats.reported, 0);
    }

    #[test]
    fn test_per_test_ignore() {
        let ignore = IgnoreSet::new().with_test("test_a", ["expected warning"]);
        let mut associator = Associator::default();
        let lines = [
            start("test_a"),
            line("WARN:", "expected warning"),
            start("test_b"),
            line("WARN:", "expected warning"),
        ];

        let stats = JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.tests_started, 2);
        let names: Vec<&str> = associator
            .passed()
            .iter()
            .map(|t| t.test_name.as_str())
            .collect();
        assert_eq!(names, vec!["test_b"]);
    }

    #[test]
    fn test_message_text_starts_after_level_token() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let lines = [
            "10-14 02:13:55.123 10.0.0.7:54321 31337 WARNmon WARN disk low".to_string(),
            "10-14 02:13:56.001 10.0.0.7:54321 31337 ERRR:pool ERRR: pool ERRR: drained"
                .to_string(),
        ];

        JavaMessageScanner::scan_lines(&lines, &ignore, &mut associator);

        let texts: Vec<&str> = associator
            .general()
            .iter()
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(texts, vec!["disk low\n", "pool ERRR: drained\n"]);
    }

    #[test]
    fn test_current_test_tracking() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let mut scanner = JavaMessageScanner::new(&ignore, &mut associator);
        assert_eq!(scanner.current_test(), "");
        scanner.process_line(&start("pyunit_glm.py"));
        assert_eq!(scanner.current_test(), "pyunit_glm.py");
    }

    #[test]
    fn test_scan_reader() {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::default();
        let input = format!("{}\n{}\n", start("t"), line("WARN:", "w"));
        let stats = JavaMessageScanner::scan_reader(input.as_bytes(), &ignore, &mut associator)
            .expect("Should read");
        assert_eq!(stats.lines, 2);
        assert_eq!(associator.passed()[0].messages[0].message, "w\n");
    }
}
