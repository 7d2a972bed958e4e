// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build metadata matchers
//!
//! Each [`Matcher`] inspects one console line at a time and extracts a single
//! piece of build metadata into the [`ConsoleScan`]. A matcher reports two
//! things per line:
//!
//! - a [`Flow`]: whether the console scan may continue at all, and
//! - a [`Status`]: whether the matcher is satisfied and can be retired.
//!
//! Field extraction is positional on purpose. The markers and token offsets
//! below mirror the console output Jenkins and the test harness actually
//! print.

use chrono::{Month, Weekday};
use tracing::debug;

use crate::record::set_once;
use crate::scanner::ConsoleScan;

/// Marker preceding the name of the node a build runs on
pub const NODE_NAME_MARKER: &str = "Building remotely on";

/// Console color reset artifact that can be glued to the node name
pub const CONSOLE_COLOR_RESET: &str = "[0m";

/// Marker preceding the build id
pub const BUILD_ID_MARKER: &str = "Build id is";

/// Marker followed by the git hash and then the branch
pub const GIT_REVISION_MARKER: &str = "Checking out Revision";

/// Marker printed when the build was killed for running too long
pub const BUILD_TIMEOUT_MARKER: &str = "Build timed out";

/// Lowercase phrases denoting a failed build
///
/// The first phrase is also printed when a build fails only because some
/// tests failed, so it is ignored once a failed test has been registered.
pub const BUILD_FAILURE_PHRASES: [&str; 2] = ["finished: failure", "build failed"];

/// Substrings that must all appear on a line announcing a Java output log
pub const JAVA_LOG_MARKERS: [&str; 3] = ["Cloud", "Node", "started with output file"];

/// Whether the console scan may continue after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep scanning
    Continue,
    /// Terminal build state; ignore all remaining lines
    Stop,
}

/// Whether a matcher still needs to see lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not yet satisfied
    Pending,
    /// Satisfied; the driver retires the matcher
    Done,
}

/// Result of inspecting one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Scan control
    pub flow: Flow,
    /// Matcher lifecycle
    pub status: Status,
}

impl MatchOutcome {
    /// Nothing found, keep going
    pub const PENDING: Self = Self {
        flow: Flow::Continue,
        status: Status::Pending,
    };

    /// Field captured, retire the matcher
    pub const DONE: Self = Self {
        flow: Flow::Continue,
        status: Status::Done,
    };

    /// Terminal state reached, stop the scan
    pub const STOP: Self = Self {
        flow: Flow::Stop,
        status: Status::Done,
    };
}

/// A single-responsibility console line inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Build start timestamp
    Timestamp,
    /// Node the build ran on
    NodeName,
    /// Build id
    BuildId,
    /// Git hash and branch
    GitRevision,
    /// Build killed for running too long
    BuildTimeout,
    /// Build failed for reasons other than failed tests
    BuildFailure,
    /// Paths of per-node Java output logs; never retires
    JavaLogCollector,
}

impl Matcher {
    /// All matchers, in the order the driver consults them on every line
    pub const REGISTRATION_ORDER: [Matcher; 7] = [
        Matcher::Timestamp,
        Matcher::NodeName,
        Matcher::BuildId,
        Matcher::GitRevision,
        Matcher::BuildTimeout,
        Matcher::BuildFailure,
        Matcher::JavaLogCollector,
    ];

    /// Short name for logging
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Matcher::Timestamp => "timestamp",
            Matcher::NodeName => "node_name",
            Matcher::BuildId => "build_id",
            Matcher::GitRevision => "git_revision",
            Matcher::BuildTimeout => "build_timeout",
            Matcher::BuildFailure => "build_failure",
            Matcher::JavaLogCollector => "java_log_collector",
        }
    }

    /// Inspect one console line, updating `scan` when the line matches
    pub fn inspect(self, line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
        match self {
            Matcher::Timestamp => match_timestamp(line, scan),
            Matcher::NodeName => match_node_name(line, scan),
            Matcher::BuildId => match_build_id(line, scan),
            Matcher::GitRevision => match_git_revision(line, scan),
            Matcher::BuildTimeout => match_build_timeout(line, scan),
            Matcher::BuildFailure => match_build_failure(line, scan),
            Matcher::JavaLogCollector => collect_java_log(line, scan),
        }
    }
}

fn names_weekday(token: &str) -> bool {
    token.trim_end_matches(',').parse::<Weekday>().is_ok()
}

fn names_month(token: &str) -> bool {
    token.trim_end_matches(',').parse::<Month>().is_ok()
}

/// Check whether a line looks like `<weekday> <month> ...`, optionally
/// preceded by one leading token
#[must_use]
pub fn is_timestamp_line(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= 2 {
        return false;
    }
    (names_weekday(tokens[0]) && names_month(tokens[1]))
        || (names_weekday(tokens[1]) && names_month(tokens[2]))
}

fn match_timestamp(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    let line = line.trim();
    if !is_timestamp_line(line) {
        return MatchOutcome::PENDING;
    }
    set_once(&mut scan.record.timestamp, line);
    debug!(timestamp = line, "found build timestamp");
    MatchOutcome::DONE
}

/// Strip a console color artifact (and anything before it) from a token
#[must_use]
pub fn strip_color_artifact(token: &str) -> &str {
    match token.split_once(CONSOLE_COLOR_RESET) {
        Some((_, rest)) => rest,
        None => token,
    }
}

fn match_node_name(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    let Some((_, rest)) = line.split_once(NODE_NAME_MARKER) else {
        return MatchOutcome::PENDING;
    };
    let Some(token) = rest.split_whitespace().next() else {
        return MatchOutcome::PENDING;
    };
    let node = strip_color_artifact(token);
    if node.is_empty() {
        return MatchOutcome::PENDING;
    }
    set_once(&mut scan.record.node_name, node);
    debug!(node, "found node name");
    MatchOutcome::DONE
}

fn match_build_id(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    let Some((_, rest)) = line.split_once(BUILD_ID_MARKER) else {
        return MatchOutcome::PENDING;
    };
    let build_id = rest.trim();
    if build_id.is_empty() {
        return MatchOutcome::PENDING;
    }
    set_once(&mut scan.record.build_id, build_id);
    debug!(build_id, "found build id");
    MatchOutcome::DONE
}

fn match_git_revision(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    let Some((_, rest)) = line.split_once(GIT_REVISION_MARKER) else {
        return MatchOutcome::PENDING;
    };
    let mut tokens = rest.split_whitespace();
    let (Some(hash), Some(branch)) = (tokens.next(), tokens.next()) else {
        return MatchOutcome::PENDING;
    };
    set_once(&mut scan.record.git_hash, hash);
    set_once(&mut scan.record.git_branch, branch);
    debug!(hash, branch, "found git revision");
    MatchOutcome::DONE
}

fn match_build_timeout(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    if !line.contains(BUILD_TIMEOUT_MARKER) {
        return MatchOutcome::PENDING;
    }
    scan.record.build_timeout = true;
    scan.failure_occurred = true;
    debug!("build timed out, stopping console scan");
    MatchOutcome::STOP
}

fn match_build_failure(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    let lowered = line.to_lowercase();
    for (index, phrase) in BUILD_FAILURE_PHRASES.iter().enumerate() {
        if !lowered.contains(phrase) {
            continue;
        }
        // Job failure caused by already known test failures
        if index == 0 && !scan.failed_tests.is_empty() {
            continue;
        }
        scan.record.build_failure = true;
        scan.failure_occurred = true;
        debug!(phrase, "build failed, stopping console scan");
        return MatchOutcome::STOP;
    }
    MatchOutcome::PENDING
}

fn collect_java_log(line: &str, scan: &mut ConsoleScan) -> MatchOutcome {
    if JAVA_LOG_MARKERS.iter().all(|marker| line.contains(marker)) {
        if let Some(path) = line.split_whitespace().last() {
            debug!(path, "found java output log");
            scan.java_logs.push(path.to_string());
        }
    }
    MatchOutcome::PENDING
}
