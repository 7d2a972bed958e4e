//! Writing reports to disk

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ScrapeError;
use crate::report::{Report, SUMMARY_BANNER};

/// Files written for one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    /// `<job>_build_<id>.json`
    pub json: PathBuf,
    /// `<job>_build_<id>_failed_tests.log`
    pub failed_log: PathBuf,
    /// `<job>_build_<id>_passed_tests.log`, only when a passed test logged
    /// bad messages
    pub passed_log: Option<PathBuf>,
}

impl WrittenReport {
    /// Text logs in the order they were written
    pub fn logs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.failed_log.as_path()).chain(self.passed_log.as_deref())
    }
}

/// Write the JSON report and its text logs into `dir`
///
/// Existing files are overwritten.
///
/// # Errors
///
/// Returns `ScrapeError::Write` if a file cannot be written.
pub fn write_report(report: &Report, dir: &Path) -> Result<WrittenReport, ScrapeError> {
    let stem = report.file_stem();

    let json = dir.join(format!("{stem}.json"));
    write_file(&json, &report.to_json()?)?;

    let failed_log = dir.join(format!("{stem}_failed_tests.log"));
    write_file(&failed_log, &report.failed_log().to_string())?;

    let passed_log = match report.passed_log() {
        Some(log) => {
            let path = dir.join(format!("{stem}_passed_tests.log"));
            write_file(&path, &log.to_string())?;
            Some(path)
        }
        None => None,
    };

    info!(json = %json.display(), "report written");
    Ok(WrittenReport {
        json,
        failed_log,
        passed_log,
    })
}

/// Append every written log to `summary` under a banner
///
/// # Errors
///
/// Returns `ScrapeError::Write` if a log cannot be read back or the summary
/// cannot be appended to.
pub fn append_summary(summary: &Path, written: &WrittenReport) -> Result<(), ScrapeError> {
    let write_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ScrapeError::Write { path, source }
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(summary)
        .map_err(write_error(summary))?;

    for log in written.logs() {
        let content = fs::read_to_string(log).map_err(write_error(log))?;
        write!(file, "{SUMMARY_BANNER} {}\n\n{content}\n", log.display())
            .map_err(write_error(summary))?;
    }
    info!(summary = %summary.display(), "summary updated");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), ScrapeError> {
    fs::write(path, content).map_err(|source| ScrapeError::Write {
        path: path.to_path_buf(),
        source,
    })
}
