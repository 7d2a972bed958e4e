//! Configuration for the logscrape binary
//!
//! This module provides the command line interface, the defaults for the
//! ignore set and output locations, and the conversion into the options a
//! [`ScanSession`](crate::session::ScanSession) runs with.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use logscrape_console::BuildRecord;
use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactRoot, DEFAULT_ARTIFACT_PATH_SKIP, JobLocator};
use crate::session::ScrapeOptions;

/// File name of the ignore set under the data directory
pub const IGNORE_LIST_FILE: &str = "bad_java_messages_to_exclude.json";

/// Kind of test suite the build ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    /// Java unit tests
    #[default]
    Junit,
    /// Python tests
    Pyunit,
    /// R tests
    Runit,
    /// Hadoop smoke tests
    Hadoop,
}

impl TestCategory {
    /// Lowercase name as used on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestCategory::Junit => "junit",
            TestCategory::Pyunit => "pyunit",
            TestCategory::Runit => "runit",
            TestCategory::Hadoop => "hadoop",
        }
    }
}

/// Logscrape - failure reports from CI build consoles and node logs
#[derive(Parser, Debug, Clone)]
#[command(name = "logscrape")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Console transcript to mine (URL or local file)
    #[arg(short, long, env = "LOGSCRAPE_CONSOLE")]
    pub console: String,

    /// Job name, used when the job URL does not provide one
    #[arg(long, env = "LOGSCRAPE_JOB_NAME")]
    pub job_name: Option<String>,

    /// Build id, used when the console does not reveal one
    #[arg(long, env = "LOGSCRAPE_BUILD_ID")]
    pub build_id: Option<String>,

    /// Git commit, used when the console does not reveal one
    #[arg(long, env = "LOGSCRAPE_GIT_HASH")]
    pub git_hash: Option<String>,

    /// Node name, used when the console does not reveal one
    #[arg(long, env = "LOGSCRAPE_NODE_NAME")]
    pub node_name: Option<String>,

    /// Kind of tests the build ran
    #[arg(long, value_enum, default_value_t = TestCategory::Junit)]
    pub test_category: TestCategory,

    /// Jenkins job URL (`http://host/view/<view>/job/<job>/`)
    ///
    /// Used to derive where the build archived its node logs.
    #[arg(long, env = "LOGSCRAPE_JOB_URL")]
    pub job_url: Option<String>,

    /// Artifact base URL, overriding the one derived from --job-url
    #[arg(long)]
    pub artifact_base: Option<String>,

    /// Leading path components of a node log path to drop before
    /// appending it to the artifact base
    #[arg(long, default_value_t = DEFAULT_ARTIFACT_PATH_SKIP)]
    pub artifact_path_skip: usize,

    /// Path to the JSON ignore set of known harmless messages
    ///
    /// Defaults to ~/.local/share/logscrape/bad_java_messages_to_exclude.json
    /// (or platform equivalent).
    #[arg(short, long, env = "LOGSCRAPE_IGNORE_LIST")]
    pub ignore_list: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File every written log is appended to
    #[arg(long)]
    pub summary_file: Option<PathBuf>,

    /// Scan node logs even when no test failed
    #[arg(long, default_value = "false")]
    pub scan_all_logs: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: String::new(),
            job_name: None,
            build_id: None,
            git_hash: None,
            node_name: None,
            test_category: TestCategory::default(),
            job_url: None,
            artifact_base: None,
            artifact_path_skip: DEFAULT_ARTIFACT_PATH_SKIP,
            ignore_list: None,
            output_dir: PathBuf::from("."),
            summary_file: None,
            scan_all_logs: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Get the ignore set path, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/logscrape/bad_java_messages_to_exclude.json
    /// - Linux: ~/.local/share/logscrape/bad_java_messages_to_exclude.json
    /// - Windows: %LOCALAPPDATA%\logscrape\bad_java_messages_to_exclude.json
    #[must_use]
    pub fn ignore_list_path(&self) -> PathBuf {
        self.ignore_list.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("logscrape")
                .join(IGNORE_LIST_FILE)
        })
    }

    /// Parse the job URL, if one was given
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidJobUrl` if the URL has the wrong shape.
    pub fn job_locator(&self) -> Result<Option<JobLocator>, ConfigError> {
        self.job_url.as_deref().map(JobLocator::parse).transpose()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The console location is empty
    /// - The job URL is specified but malformed
    /// - The output directory is not a directory or cannot be created
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console.trim().is_empty() {
            return Err(ConfigError::MissingConsole);
        }

        self.job_locator()?;

        if self.output_dir.exists() {
            if !self.output_dir.is_dir() {
                return Err(ConfigError::OutputNotDirectory(self.output_dir.clone()));
            }
        } else {
            std::fs::create_dir_all(&self.output_dir).map_err(|e| {
                ConfigError::OutputDirectoryCreateFailed(self.output_dir.clone(), e)
            })?;
        }

        Ok(())
    }

    /// Options for a scan session
    ///
    /// Command line values become the fallback build record. A job name
    /// given on the command line wins over the one in the job URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidJobUrl` if the job URL is malformed.
    pub fn scrape_options(&self) -> Result<ScrapeOptions, ConfigError> {
        let locator = self.job_locator()?;
        let job_name = self
            .job_name
            .clone()
            .or_else(|| locator.as_ref().map(|l| l.job.clone()));

        let artifacts = match (&self.artifact_base, locator) {
            (Some(base), _) => ArtifactRoot::Base(base.clone()),
            (None, Some(locator)) => ArtifactRoot::Job(locator),
            (None, None) => ArtifactRoot::Local,
        };

        Ok(ScrapeOptions {
            fallback: BuildRecord {
                job_name,
                build_id: self.build_id.clone(),
                git_hash: self.git_hash.clone(),
                node_name: self.node_name.clone(),
                ..BuildRecord::new()
            },
            test_category: self.test_category,
            artifacts,
            artifact_path_skip: self.artifact_path_skip,
            scan_all_logs: self.scan_all_logs,
        })
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No console location given
    #[error("Console location is empty")]
    MissingConsole,

    /// Job URL is not `http://host/view/<view>/job/<job>/`
    #[error("Invalid Jenkins job URL: {0}")]
    InvalidJobUrl(String),

    /// Output path exists but is not a directory
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    /// Failed to create the output directory
    #[error("Failed to create output directory {0}: {1}")]
    OutputDirectoryCreateFailed(PathBuf, std::io::Error),
}
