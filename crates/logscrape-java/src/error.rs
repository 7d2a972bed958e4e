//! Error types for logscrape-java

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading Java logs or the ignore set
#[derive(Debug, Error)]
pub enum JavaLogError {
    /// Error reading a log stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ignore set file could not be read
    #[error("Failed to read ignore set {path}: {source}")]
    IgnoreSetRead {
        /// Path of the ignore set file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Ignore set file is not a JSON object of string lists
    #[error("Invalid ignore set {path}: {source}")]
    IgnoreSetFormat {
        /// Path of the ignore set file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}
