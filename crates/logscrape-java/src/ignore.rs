// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ignore set of known harmless Java messages
//!
//! The ignore set is a JSON object mapping a test name, or the literal key
//! [`GENERAL_BUCKET`], to the list of message texts that should never be
//! reported:
//!
//! ```json
//! {
//!   "general": ["Stale lock file found"],
//!   "pyunit_glm_binomial.py": ["Lambda search did not converge"]
//! }
//! ```
//!
//! Messages in the general bucket are ignored everywhere; per-test entries
//! only while that test is running. Comparison is exact against the trimmed
//! message text, whatever its level. Curating the file is a manual job; the
//! scanner only reads it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::JavaLogError;

/// Bucket applying to every message regardless of the running test
pub const GENERAL_BUCKET: &str = "general";

/// Harmless message texts, per test or general
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet {
    buckets: BTreeMap<String, BTreeSet<String>>,
}

impl IgnoreSet {
    /// Create an ignore set with an empty general bucket
    #[must_use]
    pub fn new() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(GENERAL_BUCKET.to_string(), BTreeSet::new());
        Self { buckets }
    }

    /// Load an ignore set from a JSON file
    ///
    /// A missing file yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `JavaLogError::IgnoreSetRead` if the file exists but cannot
    /// be read, or `JavaLogError::IgnoreSetFormat` if it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, JavaLogError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no ignore set found, reporting every message");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(JavaLogError::IgnoreSetRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let set = Self::from_json(&content).map_err(|source| JavaLogError::IgnoreSetFormat {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            buckets = set.buckets.len(),
            messages = set.len(),
            "loaded ignore set"
        );
        Ok(set)
    }

    /// Parse an ignore set from JSON text
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not an object of string lists.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut set: Self = serde_json::from_str(json)?;
        set.buckets.entry(GENERAL_BUCKET.to_string()).or_default();
        Ok(set)
    }

    /// Add messages ignored everywhere
    #[must_use]
    pub fn with_general<I, S>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_test(GENERAL_BUCKET, messages)
    }

    /// Add messages ignored while `test_name` runs
    #[must_use]
    pub fn with_test<I, S>(mut self, test_name: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets
            .entry(test_name.to_string())
            .or_default()
            .extend(messages.into_iter().map(Into::into));
        self
    }

    /// Decide whether a message logged while `test_name` ran is harmless
    ///
    /// An empty `test_name` means no test was running.
    #[must_use]
    pub fn is_ignored(&self, test_name: &str, message: &str) -> bool {
        let text = message.trim();
        if self.bucket_contains(GENERAL_BUCKET, text) {
            return true;
        }
        !test_name.is_empty() && self.bucket_contains(test_name, text)
    }

    /// Messages ignored for a key, if the key has a bucket
    #[must_use]
    pub fn bucket(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.buckets.get(key)
    }

    /// Total number of ignored message texts across all buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    /// Check whether nothing is ignored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_contains(&self, key: &str, text: &str) -> bool {
        self.buckets.get(key).is_some_and(|b| b.contains(text))
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_new_has_empty_general_bucket() {
        let set = IgnoreSet::new();
        assert!(set.is_empty());
        assert_eq!(set.bucket(GENERAL_BUCKET).map(BTreeSet::len), Some(0));
    }

    #[test]
    fn test_general_bucket_applies_everywhere() {
        let set = IgnoreSet::new().with_general(["Stale lock file found"]);
        assert!(set.is_ignored("", "Stale lock file found"));
        assert!(set.is_ignored("pyunit_any.py", "  Stale lock file found\n"));
        assert!(!set.is_ignored("", "Stale lock file"));
    }

    #[test]
    fn test_per_test_bucket_only_for_that_test() {
        let set = IgnoreSet::new().with_test("pyunit_glm.py", ["Lambda search did not converge"]);
        assert!(set.is_ignored("pyunit_glm.py", "Lambda search did not converge\n"));
        assert!(!set.is_ignored("pyunit_gbm.py", "Lambda search did not converge"));
        assert!(!set.is_ignored("", "Lambda search did not converge"));
    }

    #[test]
    fn test_membership_is_exact() {
        let set = IgnoreSet::new().with_general(["leak detected"]);
        assert!(!set.is_ignored("", "Leak detected"));
        assert!(!set.is_ignored("", "leak detected twice"));
    }

    #[test]
    fn test_from_json_adds_general_bucket() {
        let set = IgnoreSet::from_json(r#"{"pyunit_a.py": ["x", "y"]}"#).expect("Should parse");
        assert!(set.bucket(GENERAL_BUCKET).is_some());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(IgnoreSet::from_json(r#"["general"]"#).is_err());
        assert!(IgnoreSet::from_json(r#"{"general": "x"}"#).is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join("logscrape-no-such-ignore-set-91f3.json");
        let set = IgnoreSet::load(&path).expect("missing file is fine");
        assert_eq!(set, IgnoreSet::new());
    }

    #[test]
    fn test_load_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "logscrape-invalid-ignore-set-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").expect("write temp file");
        let result = IgnoreSet::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(JavaLogError::IgnoreSetFormat { .. })));
    }
}
