//! Typed errors for the harness and its report store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run before or after the query loop.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Input file does not exist
    #[error("input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    /// Input file exists but could not be read as UTF-8 text
    #[error("failed to read input file '{}': {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file has no non-blank lines
    #[error("no queries found in '{}'", .0.display())]
    NoQueries(PathBuf),

    /// API client could not be constructed
    #[error(transparent)]
    Client(#[from] nl2sql_client::ClientError),

    /// Report could not be written
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors reading or writing a dated report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report '{}' is not valid CSV: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("report '{}' has unexpected columns: {found:?}", .path.display())]
    UnexpectedColumns { path: PathBuf, found: Vec<String> },

    #[error("I/O error on report '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
