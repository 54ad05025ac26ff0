use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("download failed: HTTP {code} - {body}")]
    Status { code: u16, body: String },

    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("download cancelled")]
    Cancelled,
}

impl DownloadError {
    /// HTTP status of a rejected download, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DownloadError::Status { code, .. } => Some(*code),
            DownloadError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
