// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Binding diagnostic messages to tests
//!
//! The [`Associator`] holds three collections for the whole build:
//!
//! - failed tests, seeded from the console with empty message lists,
//! - passed tests that still logged bad messages,
//! - general diagnostics logged while no test was running.
//!
//! A test name lives in at most one of the two test collections. Since the
//! failed set is fixed before any Java log is scanned, a group for an
//! unknown name always goes to the passed collection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::{DiagnosticMessage, TestOutcome};

/// Final association of diagnostics for a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Associations {
    /// Failed tests in console order, with their messages
    pub failed: Vec<TestOutcome>,
    /// Passed tests that logged bad messages, in first-seen order
    pub passed: Vec<TestOutcome>,
    /// Messages logged outside of any test
    pub general: Vec<DiagnosticMessage>,
}

/// Routes finished message groups to the right collection
#[derive(Debug, Clone, Default)]
pub struct Associator {
    associations: Associations,
}

impl Associator {
    /// Create an associator seeded with the failed tests
    pub fn new<I, S>(failed_tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut failed: Vec<TestOutcome> = Vec::new();
        for name in failed_tests {
            let name = name.into();
            if !failed.iter().any(|t| t.test_name == name) {
                failed.push(TestOutcome::new(name));
            }
        }
        Self {
            associations: Associations {
                failed,
                ..Associations::default()
            },
        }
    }

    /// Attach a finished group of messages to `test_name`
    ///
    /// Empty groups are dropped. An empty name routes the messages to the
    /// general diagnostics.
    pub fn associate(&mut self, test_name: &str, messages: Vec<DiagnosticMessage>) {
        if messages.is_empty() {
            return;
        }
        if test_name.is_empty() {
            self.associations.general.extend(messages);
            return;
        }

        let count = messages.len();
        if let Some(outcome) = find_mut(&mut self.associations.failed, test_name) {
            outcome.messages.extend(messages);
            debug!(test = test_name, count, "attached messages to failed test");
        } else if let Some(outcome) = find_mut(&mut self.associations.passed, test_name) {
            outcome.messages.extend(messages);
            debug!(test = test_name, count, "attached messages to passed test");
        } else {
            self.associations.passed.push(TestOutcome {
                test_name: test_name.to_string(),
                messages,
            });
            debug!(test = test_name, count, "recorded noisy passed test");
        }
    }

    /// Record a message logged while no test was running
    pub fn add_general(&mut self, message: DiagnosticMessage) {
        self.associations.general.push(message);
    }

    /// Check whether a test is known to have failed
    #[must_use]
    pub fn is_failed(&self, test_name: &str) -> bool {
        self.associations
            .failed
            .iter()
            .any(|t| t.test_name == test_name)
    }

    /// Failed tests with their messages
    #[must_use]
    pub fn failed(&self) -> &[TestOutcome] {
        &self.associations.failed
    }

    /// Passed tests with bad messages
    #[must_use]
    pub fn passed(&self) -> &[TestOutcome] {
        &self.associations.passed
    }

    /// General diagnostics
    #[must_use]
    pub fn general(&self) -> &[DiagnosticMessage] {
        &self.associations.general
    }

    /// Finish and return the collected associations
    #[must_use]
    pub fn finish(self) -> Associations {
        self.associations
    }
}

fn find_mut<'a>(outcomes: &'a mut [TestOutcome], test_name: &str) -> Option<&'a mut TestOutcome> {
    outcomes.iter_mut().find(|t| t.test_name == test_name)
}
