use nl2sql_client::{Headers, PayloadTemplate};
use std::path::PathBuf;
use std::time::Duration;

use crate::classify::FieldPolicy;

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub api_url: String,
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub report_name: String,
    pub timeout: Duration,
    pub field_policy: FieldPolicy,
    pub payload: PayloadTemplate,
    pub headers: Headers,
}

impl HarnessConfig {
    pub fn log_keys(&self) {
        fn preview(val: &str) -> String {
            if val.is_empty() {
                return "<not set>".to_string();
            }
            let n = val
                .char_indices()
                .nth(5)
                .map(|(i, _)| i)
                .unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  API_URL: {}", self.api_url);
        tracing::info!("  INPUT: {}", self.input.display());
        tracing::info!("  OUTPUT_DIR: {}", self.output_dir.display());
        tracing::info!("  TIMEOUT: {}s", self.timeout.as_secs_f64());
        tracing::info!("  FIELD_POLICY: {:?}", self.field_policy);
        tracing::info!("  HOST_NAME: {}", preview(&self.headers.host_name));
        tracing::info!("  HTTPS_PATH: {}", preview(&self.headers.https_path));
        tracing::info!("  CLIENT_ID: {}", preview(&self.headers.client_id));
        tracing::info!("  CLIENT_SECRET: {}", preview(&self.headers.client_secret));
    }
}

pub const HOST_NAME_VAR: &str = "QUERYPROBE_HOST_NAME";
pub const HTTPS_PATH_VAR: &str = "QUERYPROBE_HTTPS_PATH";
pub const CLIENT_ID_VAR: &str = "QUERYPROBE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "QUERYPROBE_CLIENT_SECRET";

/// Read pass-through headers from the environment. Unset variables become
/// empty strings.
pub fn headers_from_env() -> Headers {
    headers_from_lookup(|key| std::env::var(key).ok())
}

pub fn headers_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Headers {
    Headers {
        host_name: lookup(HOST_NAME_VAR).unwrap_or_default(),
        https_path: lookup(HTTPS_PATH_VAR).unwrap_or_default(),
        client_id: lookup(CLIENT_ID_VAR).unwrap_or_default(),
        client_secret: lookup(CLIENT_SECRET_VAR).unwrap_or_default(),
    }
}
