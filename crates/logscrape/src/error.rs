//! Error types for logscrape

use std::path::PathBuf;

use logscrape_java::JavaLogError;

use crate::config::ConfigError;
use crate::source::FetchError;

/// Errors that abort a scrape
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The console transcript could not be fetched
    #[error("Failed to fetch console output: {0}")]
    ConsoleFetch(#[source] FetchError),

    /// The ignore set could not be loaded
    #[error("Ignore set error: {0}")]
    IgnoreSet(#[from] JavaLogError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A report file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
