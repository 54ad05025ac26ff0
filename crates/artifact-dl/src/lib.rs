//! Streaming HTTP download of job artifacts
//!
//! Saves one artifact per call into a destination directory:
//! - Streams the response body with buffered writes
//! - Picks the file name from `Content-Disposition` or the URL
//! - Removes partially written files on failure or cancellation

mod error;
pub mod filename;

use futures_util::StreamExt;
use log::{debug, info};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

pub use error::DownloadError;

/// Write buffer size (256 KB) - artifacts are usually a handful of MB
const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// A finished download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    dest_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dest_dir: dest_dir.into(),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Download `url` into the destination directory, named after the
    /// `Content-Disposition` header or the last URL segment.
    ///
    /// An existing file with the same name is overwritten.
    pub async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Downloaded, DownloadError> {
        self.fetch_as(url, &filename::from_url(url), cancel).await
    }

    /// Like [`Downloader::fetch`], but saves under `fallback_name` when the
    /// response carries no usable `Content-Disposition`.
    pub async fn fetch_as(
        &self,
        url: &str,
        fallback_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Downloaded, DownloadError> {
        debug!("artifact_fetch: {} fallback={}", url, fallback_name);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            response = self.client.get(url).send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DownloadError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename::from_content_disposition)
            .or_else(|| filename::sanitize(fallback_name))
            .unwrap_or_else(|| filename::FALLBACK_FILE_NAME.to_string());

        tokio::fs::create_dir_all(&self.dest_dir).await?;
        let destination = self.dest_dir.join(&file_name);
        let mut file = File::create(&destination).await?;

        match stream_to_file(response, &mut file, cancel).await {
            Ok(bytes) => {
                info!("artifact_saved: {} -> {} ({} bytes)", url, destination.display(), bytes);
                Ok(Downloaded {
                    path: destination,
                    bytes,
                })
            }
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&destination).await;
                Err(e)
            }
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    file: &mut File,
    cancel: &CancellationToken,
) -> Result<u64, DownloadError> {
    let mut stream = response.bytes_stream();
    let mut write_buffer = Vec::with_capacity(WRITE_BUFFER_SIZE);
    let mut written: u64 = 0;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = chunk else {
            break;
        };
        let chunk = chunk?;

        write_buffer.extend_from_slice(&chunk);
        written += chunk.len() as u64;

        if write_buffer.len() >= WRITE_BUFFER_SIZE {
            file.write_all(&write_buffer).await?;
            write_buffer.clear();
        }
    }

    if !write_buffer.is_empty() {
        file.write_all(&write_buffer).await?;
    }
    file.flush().await?;

    Ok(written)
}
