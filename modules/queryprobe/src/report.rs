use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ReportError;
use crate::types::{ResultRecord, REPORT_COLUMNS};

/// An in-memory report: ordered rows, written and read as CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<ResultRecord>,
}

impl Table {
    pub fn from_records(rows: Vec<ResultRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.rows
    }

    /// Append rows after the existing ones, keeping their order.
    pub fn append(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.rows.extend(records);
    }

    /// Read a report. Fails on I/O errors, a header row other than
    /// [`REPORT_COLUMNS`], or any malformed row.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let csv_err = |source: csv::Error| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?;
        if !headers.iter().eq(REPORT_COLUMNS) {
            return Err(ReportError::UnexpectedColumns {
                path: path.to_path_buf(),
                found: headers.iter().map(String::from).collect(),
            });
        }

        let rows = reader
            .deserialize()
            .collect::<Result<Vec<ResultRecord>, _>>()
            .map_err(csv_err)?;

        Ok(Self { rows })
    }

    /// Write the whole table to `path`, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let csv_err = |source: csv::Error| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;

        writer.write_record(REPORT_COLUMNS).map_err(csv_err)?;
        for row in &self.rows {
            writer.serialize(row).map_err(csv_err)?;
        }

        writer.flush().map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// State of the same-day report before this run's rows are added.
#[derive(Debug)]
pub enum Prior {
    Absent,
    Loaded(Table),
    Unreadable(ReportError),
}

/// Combine the prior same-day report with today's rows.
///
/// Prior rows come first. An unreadable prior report is dropped and only
/// today's rows are kept.
pub fn merge(prior: Prior, todays: Vec<ResultRecord>) -> Table {
    match prior {
        Prior::Absent => Table::from_records(todays),
        Prior::Loaded(mut existing) => {
            info!(
                existing = existing.len(),
                new = todays.len(),
                "Appending to existing report"
            );
            existing.append(todays);
            existing
        }
        Prior::Unreadable(e) => {
            warn!(error = %e, "Existing report could not be read, starting fresh");
            Table::from_records(todays)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written { path: PathBuf, rows: usize },
    /// Nothing to write; no file was touched.
    Empty,
}

/// One CSV file per calendar day, named `<base>_<YYYY-MM-DD>.csv`.
#[derive(Debug, Clone)]
pub struct DatedReport {
    dir: PathBuf,
    base_name: String,
}

impl DatedReport {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", self.base_name, date.format("%Y-%m-%d")))
    }

    pub fn load_prior(&self, date: NaiveDate) -> Prior {
        let path = self.path_for(date);
        if !path.exists() {
            return Prior::Absent;
        }
        match Table::load(&path) {
            Ok(table) => Prior::Loaded(table),
            Err(e) => Prior::Unreadable(e),
        }
    }

    /// Merge today's rows into the report for `date` and rewrite it in full.
    pub fn persist(
        &self,
        date: NaiveDate,
        todays: Vec<ResultRecord>,
    ) -> Result<PersistOutcome, ReportError> {
        let combined = merge(self.load_prior(date), todays);
        if combined.is_empty() {
            return Ok(PersistOutcome::Empty);
        }

        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(date);
        combined.save(&path)?;
        Ok(PersistOutcome::Written {
            path,
            rows: combined.len(),
        })
    }
}
