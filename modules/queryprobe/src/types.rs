use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers of the report, in file order.
pub const REPORT_COLUMNS: [&str; 3] = ["Original Query", "Generated SQL", "Database Response"];

/// A trimmed, non-empty line of input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Returns `None` for lines that are blank after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One report row: what was asked, what SQL came back, and what the database returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Original Query")]
    pub original_query: String,
    #[serde(rename = "Generated SQL")]
    pub generated_sql: String,
    #[serde(rename = "Database Response")]
    pub database_response: String,
}

impl ResultRecord {
    pub fn new(
        original_query: impl Into<String>,
        generated_sql: impl Into<String>,
        database_response: impl Into<String>,
    ) -> Self {
        Self {
            original_query: original_query.into(),
            generated_sql: generated_sql.into(),
            database_response: database_response.into(),
        }
    }
}
