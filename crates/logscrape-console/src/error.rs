// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for logscrape-console

use thiserror::Error;

/// Errors that can occur while reading a console transcript
///
/// Individual lines never produce errors; a line that does not have the
/// shape a matcher expects is simply not matched.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Error reading the console stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
