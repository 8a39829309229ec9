pub mod builder;
pub mod error;
pub mod outcome;
pub mod types;

pub use builder::RequestBuilder;
pub use error::{ClientError, Result};
pub use outcome::Outcome;
pub use types::{Headers, ModelParams, PayloadTemplate, RequestPayload, TuningParams};

use async_trait::async_trait;
use outcome::non_empty;
use std::time::Duration;

/// Bounded wait for one API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one built request and reports how it concluded.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, payload: &RequestPayload, headers: &Headers) -> Outcome;
}

pub struct Nl2SqlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Nl2SqlClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        reqwest::Url::parse(endpoint)
            .map_err(|e| ClientError::Endpoint(format!("{endpoint}: {e}")))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl Dispatcher for Nl2SqlClient {
    async fn dispatch(&self, payload: &RequestPayload, headers: &Headers) -> Outcome {
        // Headers go on first so `.json()` keeps our Content-Type instead of adding its own.
        let mut request = self.client.post(&self.endpoint);
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }

        let resp = match request.json(payload).send().await {
            Ok(resp) => resp,
            Err(e) => return Outcome::from_reqwest(e),
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Outcome::from_reqwest(e),
        };

        if !status.is_success() {
            tracing::debug!(status = %status, "API returned non-success status");
            return Outcome::TransportOrStatusError {
                message: format!("HTTP status {status} for url: {}", self.endpoint),
                body: non_empty(text),
            };
        }

        match serde_json::from_str(&text) {
            Ok(body) => Outcome::Success(body),
            Err(e) => {
                tracing::debug!(error = %e, "Response body is not valid JSON");
                Outcome::MalformedBody {
                    raw: non_empty(text),
                }
            }
        }
    }
}
