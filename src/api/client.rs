use crate::config::MonitorConfig;
use crate::error::{error_detail, ApiError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Typed client for the assistant backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &MonitorConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(http, &config.api_base))
    }

    pub fn with_client(http: Client, base: &str) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// `path` is the route with `{}` already filled; each segment must be encoded by the caller.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Read a JSON body, turning non-2xx answers into `ApiError::Status`.
    pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
