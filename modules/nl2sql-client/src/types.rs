use serde::{Deserialize, Serialize};

/// Generation-control fields forwarded to the model behind the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningParams {
    pub model: String,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stop: String,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: "string".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParams {
    pub model_url: String,
    pub api_version: String,
    pub tuning_params: TuningParams,
}

/// The constant part of every request body. One value per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadTemplate {
    pub gateway: String,
    pub service_provider: String,
    pub kb_connector: String,
    pub catalog_provider: String,
    pub model_params: ModelParams,
}

/// Request body sent for a single query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    #[serde(flatten)]
    pub template: PayloadTemplate,
    pub user_query: String,
}

/// Routing and credential headers. Sent verbatim, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    pub host_name: String,
    pub https_path: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Headers {
    pub const CONTENT_TYPE: &'static str = "application/json";

    /// Header name/value pairs in the order they are attached to a request.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("host_name", self.host_name.as_str()),
            ("https_path", self.https_path.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("Content-Type", Self::CONTENT_TYPE),
        ]
    }
}
