// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Scan session
//!
//! A [`ScanSession`] runs the whole pipeline for one build:
//!
//! 1. scan the console transcript, then fill the gaps from the fallback
//!    record supplied on the command line,
//! 2. decide which node logs to read and where they live,
//! 3. fetch the node logs concurrently and scan them one by one in console
//!    order, sharing one [`Associator`],
//! 4. assemble the [`Report`].
//!
//! Each step is a separate method so callers can feed lines from anywhere.

use std::sync::Arc;

use logscrape_console::{BuildRecord, ConsoleScan, ConsoleScanner};
use logscrape_java::{Associations, Associator, IgnoreSet, JavaMessageScanner};
use tracing::{debug, info, warn};

use crate::artifact::{self, ArtifactRoot, DEFAULT_ARTIFACT_PATH_SKIP};
use crate::config::{Config, TestCategory};
use crate::error::ScrapeError;
use crate::report::Report;
use crate::source::{self, FetchError, LineSource};

/// Options for one scan session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Values used for fields the console does not reveal
    pub fallback: BuildRecord,
    /// Kind of tests the build ran
    pub test_category: TestCategory,
    /// Where node logs are read from
    pub artifacts: ArtifactRoot,
    /// Leading node log path components to drop under an artifact base
    pub artifact_path_skip: usize,
    /// Scan node logs even when no test failed
    pub scan_all_logs: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            fallback: BuildRecord::new(),
            test_category: TestCategory::default(),
            artifacts: ArtifactRoot::Local,
            artifact_path_skip: DEFAULT_ARTIFACT_PATH_SKIP,
            scan_all_logs: false,
        }
    }
}

/// Pipeline state for one build
#[derive(Debug, Clone)]
pub struct ScanSession {
    options: ScrapeOptions,
    ignore: IgnoreSet,
}

impl ScanSession {
    /// Create a session
    #[must_use]
    pub fn new(options: ScrapeOptions, ignore: IgnoreSet) -> Self {
        Self { options, ignore }
    }

    /// Create a session from the command line configuration
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` if the job URL is malformed, or
    /// `ScrapeError::IgnoreSet` if the ignore set exists but cannot be read.
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let options = config.scrape_options()?;
        let ignore = IgnoreSet::load(config.ignore_list_path())?;
        debug!(ignored = ignore.len(), "ignore set ready");
        Ok(Self::new(options, ignore))
    }

    /// Session options
    #[must_use]
    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    /// Ignore set applied to node log messages
    #[must_use]
    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Scan the console transcript
    ///
    /// Fields the console leaves unset are taken from the fallback record.
    pub fn scan_console<I, S>(&self, lines: I) -> ConsoleScan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scan = ConsoleScanner::scan_lines(lines);
        scan.record.fill_missing(&self.options.fallback);
        info!(
            job = scan.record.job_name_or_unknown(),
            build = scan.record.build_id_or_unknown(),
            failed_tests = scan.failed_tests.len(),
            node_logs = scan.java_logs.len(),
            timeout = scan.record.build_timeout,
            build_failure = scan.record.build_failure,
            "console scanned"
        );
        scan
    }

    /// Locations of the node logs worth reading for this build
    ///
    /// Empty unless a test failed or every log was requested.
    #[must_use]
    pub fn log_locations(&self, scan: &ConsoleScan) -> Vec<String> {
        if scan.failed_tests.is_empty() && !self.options.scan_all_logs {
            debug!("no failed tests, node logs not scanned");
            return Vec::new();
        }

        match self.options.artifacts.base_url(&scan.record) {
            Some(base) => scan
                .java_logs
                .iter()
                .map(|path| artifact::resolve(&base, path, self.options.artifact_path_skip))
                .collect(),
            None => scan.java_logs.clone(),
        }
    }

    /// Scan fetched node logs in the given order
    ///
    /// Logs that could not be fetched contribute nothing.
    pub fn scan_java_logs<I>(&self, scan: &ConsoleScan, logs: I) -> Associations
    where
        I: IntoIterator<Item = (String, Result<Vec<String>, FetchError>)>,
    {
        let mut associator = Associator::new(scan.failed_tests.iter());
        for (location, fetched) in logs {
            let lines = match fetched {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(location = %location, error = %e, "skipping node log");
                    continue;
                }
            };
            let stats = JavaMessageScanner::scan_lines(&lines, &self.ignore, &mut associator);
            info!(
                location = %location,
                tests = stats.tests_started,
                reported = stats.reported,
                ignored = stats.ignored,
                "node log scanned"
            );
        }
        associator.finish()
    }

    /// Assemble the report, `None` for a clean build
    #[must_use]
    pub fn assemble(&self, scan: &ConsoleScan, associations: Associations) -> Option<Report> {
        Report::assemble(scan, associations, self.options.test_category)
    }

    /// Run the whole pipeline against `source`
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::ConsoleFetch` if the console cannot be read.
    /// Unreadable node logs are skipped.
    pub async fn run(
        &self,
        source: Arc<dyn LineSource>,
        console: &str,
    ) -> Result<Option<Report>, ScrapeError> {
        info!(console, "reading console output");
        let console_lines = source::fetch_one(Arc::clone(&source), console.to_string())
            .await
            .map_err(ScrapeError::ConsoleFetch)?;

        let scan = self.scan_console(&console_lines);
        let logs = source::fetch_all(source, self.log_locations(&scan)).await;
        let associations = self.scan_java_logs(&scan, logs);
        Ok(self.assemble(&scan, associations))
    }
}
