// Progress monitor error types

use thiserror::Error;

/// A failed status poll. Polling stops on the first one.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("status endpoint returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("status response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from the non-polling backend endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned HTTP {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { code: 404, .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("API base must start with http:// or https://, got {0:?}")]
    InvalidApiBase(String),
}

/// FastAPI wraps errors as `{"detail": "..."}`; fall back to the raw body.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
