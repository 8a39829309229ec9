use crate::types::{Headers, PayloadTemplate, RequestPayload};

/// Builds per-query requests from the run's fixed payload template and headers.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    template: PayloadTemplate,
    headers: Headers,
}

impl RequestBuilder {
    pub fn new(template: PayloadTemplate, headers: Headers) -> Self {
        Self { template, headers }
    }

    pub fn build(&self, query: &str) -> (RequestPayload, Headers) {
        let payload = RequestPayload {
            template: self.template.clone(),
            user_query: query.to_string(),
        };
        (payload, self.headers.clone())
    }
}
