// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! logscrape-java: Java node log mining for logscrape
//!
//! This library crate scans the per-node Java output logs written while a
//! test suite runs. It attaches every WARN/ERROR/FATAL/TRACE message (and
//! the stack trace lines that follow it) to the test that was running at
//! the time, drops messages listed in the ignore set, and sorts the rest
//! into failed tests, passed-but-noisy tests and general diagnostics.

#![warn(missing_docs)]

//! ## Log Format
//!
//! Structured lines carry their level as the sixth whitespace token:
//!
//! ```text
//! 10-14 02:13:55.123 10.0.0.7:54321 31337 #09:54321 WARN: leak detected
//! ```
//!
//! Any non-structured line directly after a bad-level line continues that
//! message. A line containing `STARTING TEST:` switches the active test.
//!
//! ## Example
//!
//! ```rust
//! use logscrape_java::{Associator, IgnoreSet, JavaMessageScanner};
//!
//! let ignore = IgnoreSet::new();
//! let mut associator = Associator::new(["pyunit_glm.py"]);
//! let log = "\
//! 10-14 02:13:55.123 10.0.0.7:54321 31337 main INFO: STARTING TEST: pyunit_glm.py
//! 10-14 02:13:56.001 10.0.0.7:54321 31337 FJ-1 ERRR: glm diverged";
//!
//! JavaMessageScanner::scan_lines(log.lines(), &ignore, &mut associator);
//! assert_eq!(associator.failed()[0].messages.len(), 1);
//! ```

pub mod associator;
pub mod error;
pub mod ignore;
pub mod outcome;
pub mod scanner;
pub mod severity;

pub use associator::{Associations, Associator};
pub use error::JavaLogError;
pub use ignore::{GENERAL_BUCKET, IgnoreSet};
pub use outcome::{DiagnosticMessage, TestOutcome};
pub use scanner::{JavaMessageScanner, JavaScanStats, TEST_START_MARKER};
pub use severity::{BAD_LEVELS, LEVEL_TOKEN_INDEX, LogLevel, STRUCTURED_LEVELS};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::associator::{Associations, Associator};
    pub use crate::error::JavaLogError;
    pub use crate::ignore::IgnoreSet;
    pub use crate::outcome::{DiagnosticMessage, TestOutcome};
    pub use crate::scanner::JavaMessageScanner;
    pub use crate::severity::LogLevel;
}
