pub mod classify;
pub mod config;
pub mod error;
pub mod file_config;
pub mod report;
pub mod runner;
pub mod source;
pub mod types;
pub mod util;

pub use classify::{classify, FieldPolicy};
pub use config::HarnessConfig;
pub use error::{HarnessError, ReportError};
pub use report::{DatedReport, PersistOutcome, Table};
pub use runner::{execute, Harness, HarnessRun, RunStats, RunSummary};
pub use source::load_queries;
pub use types::{Query, ResultRecord, REPORT_COLUMNS};
