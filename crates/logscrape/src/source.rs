// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line sources for console transcripts and node logs
//!
//! A location starting with `http://` or `https://` is downloaded with
//! `ureq`; anything else is read from the local filesystem. Node logs are
//! fetched concurrently on tokio's blocking pool and handed back in the
//! order they were requested.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

/// Upper bound on a downloaded body
pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Timeout for one download
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from reading a location
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request or body read failed
    #[error("Failed to download {location}: {source}")]
    Http {
        /// URL being fetched
        location: String,
        /// Underlying ureq error
        #[source]
        source: ureq::Error,
    },

    /// Local file could not be read
    #[error("Failed to read {location}: {source}")]
    Io {
        /// Path being read
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The blocking fetch task panicked or was cancelled
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Something that can turn a location into lines of text
pub trait LineSource: Send + Sync {
    /// Read every line at `location`
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the location cannot be read.
    fn read_lines(&self, location: &str) -> Result<Vec<String>, FetchError>;
}

/// Check whether a location is fetched over HTTP
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Default source: HTTP(S) through ureq, local files otherwise
#[derive(Debug, Clone)]
pub struct RemoteSource {
    agent: ureq::Agent,
}

impl RemoteSource {
    /// Create a source with [`DEFAULT_TIMEOUT`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom per-request timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let http_error = |source| FetchError::Http {
            location: url.to_string(),
            source,
        };
        let mut response = self.agent.get(url).call().map_err(http_error)?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(http_error)
    }
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for RemoteSource {
    fn read_lines(&self, location: &str) -> Result<Vec<String>, FetchError> {
        let bytes = if is_remote(location) {
            self.download(location)?
        } else {
            std::fs::read(location).map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            })?
        };
        let lines = decode_lines(&bytes);
        debug!(location, lines = lines.len(), "fetched");
        Ok(lines)
    }
}

/// Split raw console bytes into lines
///
/// Invalid UTF-8 is replaced with U+FFFD so a stray byte only spoils its
/// own line.
#[must_use]
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, std::borrow::Cow::Owned(_)) {
        warn!("input is not valid UTF-8, undecodable bytes replaced");
    }
    text.lines().map(str::to_string).collect()
}

/// Read one location on the blocking pool
///
/// # Errors
///
/// Returns the source's error, or `FetchError::Task` if the task died.
pub async fn fetch_one(
    source: Arc<dyn LineSource>,
    location: String,
) -> Result<Vec<String>, FetchError> {
    tokio::task::spawn_blocking(move || source.read_lines(&location)).await?
}

/// Read every location concurrently
///
/// Results come back in the order of `locations`, each paired with its
/// location. Failures are logged and returned, never propagated.
pub async fn fetch_all(
    source: Arc<dyn LineSource>,
    locations: Vec<String>,
) -> Vec<(String, Result<Vec<String>, FetchError>)> {
    let pending: Vec<_> = locations
        .into_iter()
        .map(|location| {
            let source = Arc::clone(&source);
            let target = location.clone();
            let task = tokio::task::spawn_blocking(move || source.read_lines(&target));
            (location, task)
        })
        .collect();

    let mut fetched = Vec::with_capacity(pending.len());
    for (location, task) in pending {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(FetchError::Task(e)),
        };
        if let Err(e) = &result {
            warn!(location = %location, error = %e, "node log unavailable");
        }
        fetched.push((location, result));
    }
    fetched
}
