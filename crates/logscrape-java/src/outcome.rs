//! Diagnostic message and per-test outcome types

use serde::{Deserialize, Serialize};

use crate::severity::LogLevel;

/// One reported Java log message, possibly spanning several lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Level the message was logged at
    pub severity: LogLevel,
    /// Message text, continuation lines included
    pub message: String,
}

impl DiagnosticMessage {
    /// Create a new message
    #[must_use]
    pub fn new(severity: LogLevel, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Message text without surrounding whitespace, as compared against
    /// the ignore set
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.message.trim()
    }
}

/// A test and the diagnostics logged while it ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test name
    pub test_name: String,
    /// Messages in emission order
    pub messages: Vec<DiagnosticMessage>,
}

impl TestOutcome {
    /// Create an outcome with no messages yet
    #[must_use]
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            messages: Vec::new(),
        }
    }

    /// Check whether any message is attached
    #[must_use]
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}
