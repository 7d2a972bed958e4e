// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! logscrape-console: Build console mining for logscrape
//!
//! This library crate scans the console transcript of a CI build and
//! extracts build metadata (timestamp, node, build id, git revision,
//! timeout/failure flags), the names of failed tests, and the paths of the
//! per-node Java output logs mentioned along the way.
//!
//! # Example
//!
//! ```no_run
//! use logscrape_console::ConsoleScanner;
//!
//! let console = "Building remotely on mr-0xb7 in workspace /tmp\nBuild id is 42";
//! let scan = ConsoleScanner::scan_lines(console.lines());
//! assert_eq!(scan.record.build_id.as_deref(), Some("42"));
//!
//! // Or feed lines one at a time
//! let mut scanner = ConsoleScanner::new();
//! scanner.process_line("Build timed out (after 60 minutes). Marking the build as failed.");
//! assert!(scanner.is_stopped());
//! ```

pub mod error;
pub mod matcher;
pub mod record;
pub mod registrar;
pub mod scanner;

pub use error::ConsoleError;
pub use matcher::{Flow, MatchOutcome, Matcher, Status};
pub use record::{BuildRecord, UNKNOWN};
pub use registrar::{FailedTests, failed_test_name};
pub use scanner::{ConsoleScan, ConsoleScanner};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ConsoleError;
    pub use crate::record::BuildRecord;
    pub use crate::registrar::FailedTests;
    pub use crate::scanner::{ConsoleScan, ConsoleScanner};
}
