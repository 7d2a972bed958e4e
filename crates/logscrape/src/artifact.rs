// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Artifact locations for node logs
//!
//! The console prints node log paths as they were on the build node, e.g.
//! `/home/0xdiag/workspace/<job>/h2o-py/tests/results/java_0_0.out.txt`.
//! Jenkins archives them under the build's artifact URL, so the leading
//! workspace components are dropped and the remainder is appended to
//! `http://<host>/view/<view>/job/<job>/<build_id>/artifact`.

use std::str::FromStr;

use logscrape_console::BuildRecord;

use crate::config::ConfigError;

/// Leading `/`-separated components of a node log path to drop
pub const DEFAULT_ARTIFACT_PATH_SKIP: usize = 6;

/// Jenkins job identified by its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLocator {
    /// URL scheme including the colon, e.g. `http:`
    pub scheme: String,
    /// Host, with port if any
    pub host: String,
    /// Jenkins view
    pub view: String,
    /// Jenkins job
    pub job: String,
}

impl JobLocator {
    /// Parse `http://<host>/view/<view>/job/<job>[/...]`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidJobUrl` if the URL does not have that
    /// shape.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidJobUrl(url.to_string());
        let parts: Vec<&str> = url.trim_end_matches('/').split('/').collect();
        let [scheme, "", host, "view", view, "job", job, ..] = parts.as_slice() else {
            return Err(invalid());
        };
        let scheme_ok = matches!(*scheme, "http:" | "https:");
        if !scheme_ok || [host, view, job].iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }
        Ok(Self {
            scheme: (*scheme).to_string(),
            host: (*host).to_string(),
            view: (*view).to_string(),
            job: (*job).to_string(),
        })
    }

    /// Artifact URL of one build of this job
    #[must_use]
    pub fn artifact_base(&self, build_id: &str) -> String {
        format!(
            "{}//{}/view/{}/job/{}/{}/artifact",
            self.scheme, self.host, self.view, self.job, build_id
        )
    }
}

impl FromStr for JobLocator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Where node logs are read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactRoot {
    /// Paths from the console are local files
    #[default]
    Local,
    /// Fixed artifact base URL
    Base(String),
    /// Artifact base derived from the job URL and the mined build id
    Job(JobLocator),
}

impl ArtifactRoot {
    /// Artifact base for a build, `None` when logs are local
    #[must_use]
    pub fn base_url(&self, record: &BuildRecord) -> Option<String> {
        match self {
            ArtifactRoot::Local => None,
            ArtifactRoot::Base(base) => Some(base.trim_end_matches('/').to_string()),
            ArtifactRoot::Job(locator) => Some(locator.artifact_base(record.build_id_or_unknown())),
        }
    }
}

/// Append `log_path`, minus its first `skip` components, to `base`
#[must_use]
pub fn resolve(base: &str, log_path: &str, skip: usize) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for component in log_path.split('/').skip(skip).filter(|c| !c.is_empty()) {
        url.push('/');
        url.push_str(component);
    }
    url
}
