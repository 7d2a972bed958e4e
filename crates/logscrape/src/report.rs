// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Failure report assembly and text renderings
//!
//! A [`Report`] is only produced for a build that needs attention: a build
//! failure, a timeout, a failed test or a general diagnostic. Keys carry a
//! numeric prefix so the JSON reads in a fixed order.

use std::fmt;

use logscrape_console::ConsoleScan;
use logscrape_console::record::or_unknown;
use logscrape_java::{Associations, DiagnosticMessage, TestOutcome};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TestCategory;

/// Banner placed before each log appended to the summary file
pub const SUMMARY_BANNER: &str = "============ Content of";

/// Failure report for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// CI job name
    #[serde(rename = "1.job_name")]
    pub job_name: String,
    /// Build id
    #[serde(rename = "2.build_id")]
    pub build_id: String,
    /// Raw timestamp line from the console
    #[serde(rename = "3.timestamp")]
    pub timestamp: String,
    /// Git commit
    #[serde(rename = "4.git_hash")]
    pub git_hash: String,
    /// Git branch
    #[serde(rename = "5.git_branch")]
    pub git_branch: String,
    /// Build node
    #[serde(rename = "6.node_name")]
    pub node_name: String,
    /// The build itself failed
    #[serde(rename = "7.build_failure")]
    pub build_failure: bool,
    /// The build timed out
    #[serde(rename = "8.build_timeout")]
    pub build_timeout: bool,
    /// Messages logged outside of any test
    #[serde(
        rename = "9.general_diagnostics",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub general: Vec<DiagnosticMessage>,
    /// Failed tests and their messages
    #[serde(rename = "10.failed_tests", default, skip_serializing_if = "Vec::is_empty")]
    pub failed_tests: Vec<TestOutcome>,
    /// Passed tests that logged bad messages
    #[serde(rename = "11.passed_tests", default, skip_serializing_if = "Vec::is_empty")]
    pub passed_tests: Vec<TestOutcome>,
    /// Kind of tests the build ran
    #[serde(rename = "12.test_category")]
    pub test_category: TestCategory,
}

impl Report {
    /// Check whether a build needs a report at all
    ///
    /// The console flags any failed test, build failure or timeout; node
    /// logs only add general diagnostics.
    #[must_use]
    pub fn is_needed(scan: &ConsoleScan, associations: &Associations) -> bool {
        scan.failure_occurred || !associations.general.is_empty()
    }

    /// Combine the console scan and associations into a report
    ///
    /// Returns `None` when there is nothing to report. Unset text fields
    /// are reported as `"unknown"`.
    #[must_use]
    pub fn assemble(
        scan: &ConsoleScan,
        associations: Associations,
        test_category: TestCategory,
    ) -> Option<Self> {
        if !Self::is_needed(scan, &associations) {
            debug!("clean build, no report needed");
            return None;
        }

        let record = &scan.record;

        let text = |field: &Option<String>| or_unknown(field).to_string();
        Some(Self {
            job_name: text(&record.job_name),
            build_id: text(&record.build_id),
            timestamp: text(&record.timestamp),
            git_hash: text(&record.git_hash),
            git_branch: text(&record.git_branch),
            node_name: text(&record.node_name),
            build_failure: record.build_failure,
            build_timeout: record.build_timeout,
            general: associations.general,
            failed_tests: associations.failed,
            passed_tests: associations.passed,
            test_category,
        })
    }

    /// Common prefix of every file written for this report
    ///
    /// Path separators (Jenkins folder jobs) become `_`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_build_{}", self.job_name, self.build_id).replace(['/', '\\'], "_")
    }

    /// Pretty JSON, newline terminated
    ///
    /// # Errors
    ///
    /// Returns the serialization error, which cannot happen for a report
    /// built by [`Report::assemble`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Text log of the failed tests
    #[must_use]
    pub fn failed_log(&self) -> TestLog<'_> {
        TestLog {
            report: self,
            title: "10.failed_tests",
            tests: &self.failed_tests,
        }
    }

    /// Text log of the passed tests that logged bad messages, if any
    #[must_use]
    pub fn passed_log(&self) -> Option<TestLog<'_>> {
        (!self.passed_tests.is_empty()).then(|| TestLog {
            report: self,
            title: "11.passed_tests",
            tests: &self.passed_tests,
        })
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "1.job_name: {}", self.job_name)?;
        writeln!(f, "2.build_id: {}", self.build_id)?;
        writeln!(f, "3.timestamp: {}", self.timestamp)?;
        writeln!(f, "4.git_hash: {}", self.git_hash)?;
        writeln!(f, "5.git_branch: {}", self.git_branch)?;
        writeln!(f, "6.node_name: {}", self.node_name)?;
        writeln!(f, "7.build_failure: {}", self.build_failure)?;
        writeln!(f, "8.build_timeout: {}", self.build_timeout)?;
        writeln!(f, "12.test_category: {}", self.test_category.as_str())?;
        writeln!(f)
    }
}

/// Text rendering of one test section of a report
///
/// Lists the header fields, the general diagnostics and then every test
/// with its messages.
pub struct TestLog<'a> {
    report: &'a Report,
    title: &'static str,
    tests: &'a [TestOutcome],
}

impl fmt::Display for TestLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report.write_header(f)?;

        if !self.report.general.is_empty() {
            writeln!(f, "9.general_diagnostics:")?;
            for message in &self.report.general {
                write_message(f, message)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}:", self.title)?;
        for test in self.tests {
            writeln!(f)?;
            writeln!(f, "Test Name: {}", test.test_name)?;
            if test.has_messages() {
                writeln!(f, "Java Message Type and Message:")?;
                for message in &test.messages {
                    write_message(f, message)?;
                }
            }
        }
        Ok(())
    }
}

fn write_message(f: &mut fmt::Formatter<'_>, message: &DiagnosticMessage) -> fmt::Result {
    writeln!(f, "{} {}", message.severity, message.message.trim_end())
}
