use serde_json::Value;

/// How a single dispatch concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Success status with a JSON body.
    Success(Value),
    /// No response within the client timeout.
    TimedOut,
    /// Connection failure or non-success status. `body` holds the response
    /// text when the server sent one.
    TransportOrStatusError {
        message: String,
        body: Option<String>,
    },
    /// Success status, but the body is not JSON. `raw` is `None` for an empty body.
    MalformedBody { raw: Option<String> },
}

impl Outcome {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Outcome::TimedOut
        } else {
            Outcome::TransportOrStatusError {
                message: err.to_string(),
                body: None,
            }
        }
    }
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
