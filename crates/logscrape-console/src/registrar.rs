// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Failed test detection
//!
//! Test runners print one line per failed test somewhere in the console.
//! Those lines are recognised by a deliberately loose heuristic:
//!
//! - at least [`MIN_FAILED_TEST_TOKENS`] whitespace separated tokens,
//! - the substring [`FAILED_TEST_MARKER`] somewhere in the line,
//! - but not [`BUILD_FAILURE_BANNER`], which belongs to build-wide banners
//!   such as `BUILD FAILURE`.
//!
//! The test name is the second-to-last token of the line.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substring every failed test line carries
pub const FAILED_TEST_MARKER: &str = "FAIL";

/// Substring that marks a build-wide failure banner instead of a test
pub const BUILD_FAILURE_BANNER: &str = "FAILURE";

/// Minimum number of whitespace tokens on a failed test line
pub const MIN_FAILED_TEST_TOKENS: usize = 5;

/// Extract the failed test name from a console line, if it names one
///
/// # Example
///
/// ```
/// use logscrape_console::failed_test_name;
///
/// assert_eq!(
///     failed_test_name("FAIL pyunit_glm.py::test_binomial bar baz qux"),
///     Some("baz")
/// );
/// assert_eq!(failed_test_name("[ERROR] BUILD FAILURE see log for details"), None);
/// ```
#[must_use]
pub fn failed_test_name(line: &str) -> Option<&str> {
    if !line.contains(FAILED_TEST_MARKER) || line.contains(BUILD_FAILURE_BANNER) {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_FAILED_TEST_TOKENS {
        return None;
    }
    tokens.get(tokens.len() - 2).copied()
}

/// Ordered registry of failed test names
///
/// Names are unique; registering a name twice keeps the first position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailedTests {
    names: Vec<String>,
}

impl FailedTests {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the failed test named by `line`, if any
    ///
    /// Returns the test name when the line matched the heuristic, even if
    /// the name was already registered.
    pub fn register_line<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        let name = failed_test_name(line)?;
        if self.register(name) {
            debug!(test = name, "registered failed test");
        }
        Some(name)
    }

    /// Register a failed test by name
    ///
    /// Returns `true` if the name was not yet known.
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Check whether a test is registered as failed
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of failed tests
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no test failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Failed test names in registration order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over failed test names in registration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FailedTests {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for name in iter {
            let name = name.into();
            registry.register(&name);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_second_to_last_token_is_the_name() {
        assert_eq!(
            failed_test_name("FAIL something.py::test_foo bar baz qux"),
            Some("baz")
        );
        assert_eq!(
            failed_test_name("FAILED test_foo PASS junit x"),
            Some("junit")
        );
    }

    #[test]
    fn test_too_few_tokens() {
        assert_eq!(failed_test_name("FAILED test_foo PASS junit"), None);
        assert_eq!(failed_test_name("FAIL something.py::test_foo bar baz"), None);
    }

    #[test]
    fn test_failure_banner_is_not_a_test() {
        assert_eq!(failed_test_name("[INFO] BUILD FAILURE in module h2o-core now"), None);
        assert_eq!(failed_test_name("Finished: FAILURE because tests broke badly"), None);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert_eq!(failed_test_name("fail pyunit_a.py x y z"), None);
        assert_eq!(failed_test_name("SOMETHINGFAILED a b c d"), Some("c"));
    }

    #[test]
    fn test_register_line_deduplicates() {
        let mut failed = FailedTests::new();
        assert_eq!(failed.register_line("FAIL a b test_x 1.2s"), Some("test_x"));
        assert_eq!(failed.register_line("FAIL c d test_x 0.4s"), Some("test_x"));
        assert_eq!(failed.register_line("PASS a b test_y 0.1s"), None);
        assert_eq!(failed.len(), 1);
        assert!(failed.contains("test_x"));
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let failed: FailedTests = ["b", "a", "b", "c"].into_iter().collect();
        assert_eq!(failed.names(), &["b", "a", "c"]);
        assert_eq!(failed.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let failed: FailedTests = ["test_a", "test_b"].into_iter().collect();
        let json = serde_json::to_string(&failed).expect("Should serialize");
        assert_eq!(json, r#"["test_a","test_b"]"#);
    }
}
