use nl2sql_client::Outcome;
use serde_json::Value;

use crate::types::{Query, ResultRecord};

// Failure sentinels. Reports are filtered on these, keep them stable.
pub const REQUEST_TIMEOUT: &str = "Request Timeout";
pub const API_ERROR: &str = "API Error";
pub const INVALID_JSON_RESPONSE: &str = "Invalid JSON Response";
pub const RESPONSE_KEY_ERROR: &str = "Response Key Error";

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_RESPONSE_RECEIVED: &str = "No response received";

pub const SQL_QUERY_FIELD: &str = "sql_query";
pub const DB_RESPONSE_FIELD: &str = "db_response";

/// What to do when a success body lacks `sql_query` or `db_response`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Record `"N/A"` for the missing field.
    #[default]
    Lenient,
    /// Record a `"Response Key Error"` row naming the missing field.
    Strict,
}

/// Map one dispatch outcome to its report row. Every outcome yields a row.
pub fn classify(query: &Query, outcome: &Outcome, policy: FieldPolicy) -> ResultRecord {
    let (generated_sql, database_response) = match outcome {
        Outcome::Success(body) => classify_body(body, policy),
        Outcome::TimedOut => (REQUEST_TIMEOUT.to_string(), REQUEST_TIMEOUT.to_string()),
        Outcome::TransportOrStatusError { message, body } => (
            API_ERROR.to_string(),
            format!("{API_ERROR}: {}", error_detail(message, body.as_deref())),
        ),
        Outcome::MalformedBody { raw } => (
            INVALID_JSON_RESPONSE.to_string(),
            raw.clone().unwrap_or_else(|| NO_RESPONSE_RECEIVED.to_string()),
        ),
    };

    ResultRecord {
        original_query: query.to_string(),
        generated_sql,
        database_response,
    }
}

/// The first expected field absent from `body`, checked in report column order.
pub fn missing_field(body: &Value) -> Option<&'static str> {
    [SQL_QUERY_FIELD, DB_RESPONSE_FIELD]
        .into_iter()
        .find(|name| body.get(*name).is_none())
}

fn classify_body(body: &Value, policy: FieldPolicy) -> (String, String) {
    if policy == FieldPolicy::Strict {
        if let Some(name) = missing_field(body) {
            return (
                RESPONSE_KEY_ERROR.to_string(),
                format!("Missing key: {name}. Full response: {}", render_value(body)),
            );
        }
    }

    let field = |name: &str| {
        body.get(name)
            .map(render_value)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    (field(SQL_QUERY_FIELD), field(DB_RESPONSE_FIELD))
}

fn error_detail(message: &str, body: Option<&str>) -> String {
    match body {
        Some(body) => format!("{message} (response: {body})"),
        None => message.to_string(),
    }
}

/// Render a response value for the report.
///
/// Top-level strings are kept verbatim. Everything else is JSON with a space
/// after each `,` and `:`, e.g. `[1, 2, 3]`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_spaced(other, &mut out);
            out
        }
    }
}

fn write_spaced(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_spaced(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push_str(": ");
                write_spaced(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
