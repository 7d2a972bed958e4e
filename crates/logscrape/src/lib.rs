//! logscrape library
//!
//! This module exports the pipeline behind the `logscrape` binary for use in
//! integration tests and as a library: reading a CI build console and the
//! node logs it points to, and turning them into a failure report.

pub mod artifact;
pub mod config;
pub mod error;
pub mod persist;
pub mod report;
pub mod session;
pub mod source;

pub use error::ScrapeError;
pub use report::Report;
pub use session::{ScanSession, ScrapeOptions};
pub use source::{FetchError, LineSource, RemoteSource};
