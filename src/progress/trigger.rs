//! Download side effects of a completed job

use super::types::ArtifactKind;
use crate::config::MonitorConfig;
use artifact_dl::{filename, Downloader};
use futures_util::future::BoxFuture;
use log::info;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// Starts one artifact download. The returned future performs it; the
/// monitor spawns it and only logs the outcome.
pub trait DownloadTrigger: Send + Sync {
    fn trigger(&self, kind: ArtifactKind, url: String) -> BoxFuture<'static, Result<(), String>>;
}

/// Streams artifacts into the configured output directory.
#[derive(Debug, Clone)]
pub struct ArtifactDownloads {
    downloader: Downloader,
    cancel: CancellationToken,
}

impl ArtifactDownloads {
    pub fn new(config: &MonitorConfig) -> Result<Self, reqwest::Error> {
        // Artifacts can be large, so only the connect phase is bounded.
        let client = Client::builder()
            .connect_timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            downloader: Downloader::new(client, &config.output_dir),
            cancel: CancellationToken::new(),
        })
    }

    /// Abort every download started through this trigger.
    pub fn cancel_all(&self) {
        self.cancel.cancel();
    }
}

impl DownloadTrigger for ArtifactDownloads {
    fn trigger(&self, kind: ArtifactKind, url: String) -> BoxFuture<'static, Result<(), String>> {
        let downloader = self.downloader.clone();
        let cancel = self.cancel.clone();
        // Artifact URLs of one job share their last segment (the job id).
        let fallback = format!("{}_{}", kind, filename::from_url(&url));
        Box::pin(async move {
            let done = downloader
                .fetch_as(&url, &fallback, &cancel)
                .await
                .map_err(|e| e.to_string())?;
            info!("artifact_ready: {} {}", kind, done.path.display());
            Ok(())
        })
    }
}

/// Logs the URLs without fetching anything.
#[derive(Debug, Default)]
pub struct SkipDownloads;

impl DownloadTrigger for SkipDownloads {
    fn trigger(&self, kind: ArtifactKind, url: String) -> BoxFuture<'static, Result<(), String>> {
        info!("artifact_skipped: {} {}", kind, url);
        Box::pin(async { Ok(()) })
    }
}
