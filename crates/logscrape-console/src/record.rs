//! Build metadata record

use serde::{Deserialize, Serialize};

/// Value reported for a text field that was never found
pub const UNKNOWN: &str = "unknown";

/// Metadata about one build, filled in by the console matchers
///
/// Every text field is written at most once; the first matching console
/// line wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// CI job name (supplied by the caller, never mined)
    pub job_name: Option<String>,
    /// Build id
    pub build_id: Option<String>,
    /// Raw timestamp line
    pub timestamp: Option<String>,
    /// Git commit the build checked out
    pub git_hash: Option<String>,
    /// Git branch the build checked out
    pub git_branch: Option<String>,
    /// Name of the node the build ran on
    pub node_name: Option<String>,
    /// The build was killed for running too long
    pub build_timeout: bool,
    /// The build itself failed
    pub build_failure: bool,
}

impl BuildRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for the given job
    #[must_use]
    pub fn for_job(job_name: impl Into<String>) -> Self {
        Self {
            job_name: Some(job_name.into()),
            ..Self::default()
        }
    }

    /// Fill every text field that is still unset from `fallback`
    ///
    /// Flags are left alone; they are only ever raised by the console.
    pub fn fill_missing(&mut self, fallback: &BuildRecord) {
        fill(&mut self.job_name, &fallback.job_name);
        fill(&mut self.build_id, &fallback.build_id);
        fill(&mut self.timestamp, &fallback.timestamp);
        fill(&mut self.git_hash, &fallback.git_hash);
        fill(&mut self.git_branch, &fallback.git_branch);
        fill(&mut self.node_name, &fallback.node_name);
    }

    /// Build id, or [`UNKNOWN`]
    #[must_use]
    pub fn build_id_or_unknown(&self) -> &str {
        or_unknown(&self.build_id)
    }

    /// Job name, or [`UNKNOWN`]
    #[must_use]
    pub fn job_name_or_unknown(&self) -> &str {
        or_unknown(&self.job_name)
    }

    /// Whether the build ended in a timeout or a build failure
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.build_timeout || self.build_failure
    }
}

/// Write `value` into `slot` unless it already holds one
///
/// Returns `true` when the slot was written.
pub(crate) fn set_once(slot: &mut Option<String>, value: &str) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

/// Borrow an optional field, substituting [`UNKNOWN`]
#[must_use]
pub fn or_unknown(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(UNKNOWN)
}

fn fill(slot: &mut Option<String>, fallback: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(fallback);
    }
}
