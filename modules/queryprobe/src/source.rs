use std::path::Path;

use crate::error::HarnessError;
use crate::types::Query;

/// Load queries from a line-delimited file, dropping blank lines.
///
/// A missing file, an unreadable file, or a file with no usable lines is fatal.
pub fn load_queries(path: &Path) -> Result<Vec<Query>, HarnessError> {
    if !path.exists() {
        return Err(HarnessError::InputNotFound(path.to_path_buf()));
    }

    let content =
        std::fs::read_to_string(path).map_err(|source| HarnessError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let queries = parse_queries(&content);
    if queries.is_empty() {
        return Err(HarnessError::NoQueries(path.to_path_buf()));
    }

    tracing::info!(count = queries.len(), path = %path.display(), "Loaded queries");
    Ok(queries)
}

/// Split on `\n`, `\r\n` or a lone `\r`. The empty piece inside `\r\n` is
/// dropped with the other blank lines.
pub fn parse_queries(content: &str) -> Vec<Query> {
    content
        .split(|c: char| c == '\n' || c == '\r')
        .filter_map(Query::new)
        .collect()
}
