//! logscrape: failure reports from CI build consoles and node logs
//!
//! Exit status is 0 when a report was written, 2 when the build had nothing
//! to report and 1 on a fatal error.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use logscrape::config::Config;
use logscrape::{LineSource, RemoteSource, ScanSession, persist};

/// Exit status when the build needs no report
const EXIT_NOTHING_TO_REPORT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the report line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_NOTHING_TO_REPORT),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether a report was written
async fn run(config: &Config) -> anyhow::Result<bool> {
    config.validate().context("Invalid configuration")?;

    let session = ScanSession::from_config(config).context("Failed to prepare scan")?;
    let source: Arc<dyn LineSource> = Arc::new(RemoteSource::new());

    let Some(report) = session.run(source, &config.console).await? else {
        info!("No failures found, nothing to report");
        return Ok(false);
    };

    let written = persist::write_report(&report, &config.output_dir)?;
    if let Some(summary) = &config.summary_file {
        persist::append_summary(summary, &written)?;
    }

    println!("{} build {},", report.job_name, report.build_id);
    Ok(true)
}
