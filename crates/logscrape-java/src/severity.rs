// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Log level vocabularies
//!
//! Two vocabularies are kept apart on purpose. [`STRUCTURED_LEVELS`] only
//! tells whether a line is a structured log entry (and therefore ends any
//! message in progress). [`BAD_LEVELS`] decides whether the entry is worth
//! reporting. DEBUG and INFO are structured but never bad.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of the level token in a structured log line
///
/// Tokens 0-4 are date, time, address, pid and thread.
pub const LEVEL_TOKEN_INDEX: usize = 5;

/// Levels that mark the start of a structured log entry
pub const STRUCTURED_LEVELS: [LogLevel; 6] = [
    LogLevel::Warn,
    LogLevel::Error,
    LogLevel::Fatal,
    LogLevel::Trace,
    LogLevel::Debug,
    LogLevel::Info,
];

/// Levels whose messages end up in the report
pub const BAD_LEVELS: [LogLevel; 4] = [
    LogLevel::Warn,
    LogLevel::Error,
    LogLevel::Fatal,
    LogLevel::Trace,
];

/// Level of a structured Java log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// WARN
    Warn,
    /// ERRR / ERROR
    Error,
    /// FATAL
    Fatal,
    /// TRACE
    Trace,
    /// DEBUG
    Debug,
    /// INFO
    Info,
}

impl LogLevel {
    /// Parse a level token such as `WARN:`, `:WARN:` or `ERRR:`
    ///
    /// Surrounding colons are ignored; the name itself is case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim_matches(':') {
            "WARN" => Some(Self::Warn),
            "ERRR" | "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            _ => None,
        }
    }

    /// Level of a line, read from its [`LEVEL_TOKEN_INDEX`]th token, and
    /// the text after that token
    #[must_use]
    pub fn of_line(line: &str) -> Option<(Self, &str)> {
        let mut rest = line;
        for _ in 0..LEVEL_TOKEN_INDEX {
            rest = next_token(rest)?.1;
        }
        let (token, text) = next_token(rest)?;
        Self::from_token(token).map(|level| (level, text))
    }

    /// Whether this level starts a structured entry
    #[must_use]
    pub fn is_structured(self) -> bool {
        STRUCTURED_LEVELS.contains(&self)
    }

    /// Whether messages of this level are reported
    #[must_use]
    pub fn is_bad(self) -> bool {
        BAD_LEVELS.contains(&self)
    }

    /// Canonical upper-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split off the first whitespace-separated token
fn next_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some(text.split_at(end))
}
