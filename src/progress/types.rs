//! Processing status, snapshots and listener payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProcessingStatus {
    #[default]
    #[serde(rename = "preparing")]
    Preparing,
    #[serde(rename = "downloading")]
    Downloading,
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

impl ProcessingStatus {
    /// Polling stops once a session reaches a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Preparing => write!(f, "preparing"),
            ProcessingStatus::Downloading => write!(f, "downloading"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl From<&str> for ProcessingStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "downloading" => ProcessingStatus::Downloading,
            "processing" => ProcessingStatus::Processing,
            "completed" => ProcessingStatus::Completed,
            "failed" => ProcessingStatus::Failed,
            _ => ProcessingStatus::Preparing,
        }
    }
}

impl From<String> for ProcessingStatus {
    fn from(value: String) -> Self {
        ProcessingStatus::from(value.as_str())
    }
}

/// Which artifact a download URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Original,
    Processed,
    Package,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Original => write!(f, "original"),
            ArtifactKind::Processed => write!(f, "processed"),
            ArtifactKind::Package => write!(f, "package"),
        }
    }
}

/// Backend-relative artifact URLs reported with a finished job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl DownloadUrls {
    pub fn is_empty(&self) -> bool {
        self.original.is_none() && self.processed.is_none() && self.package.is_none()
    }

    /// Present URLs in trigger order: original, processed, then package if asked for.
    pub fn in_order(&self, include_package: bool) -> Vec<(ArtifactKind, &str)> {
        let mut urls = Vec::with_capacity(3);
        if let Some(url) = self.original.as_deref() {
            urls.push((ArtifactKind::Original, url));
        }
        if let Some(url) = self.processed.as_deref() {
            urls.push((ArtifactKind::Processed, url));
        }
        if include_package {
            if let Some(url) = self.package.as_deref() {
                urls.push((ArtifactKind::Package, url));
            }
        }
        urls
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| {
            obj.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let urls = DownloadUrls {
            original: field("original"),
            processed: field("processed"),
            package: field("package"),
        };
        (!urls.is_empty()).then_some(urls)
    }
}

/// One reading of the status endpoint.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProgressSnapshot {
    /// 0-100
    pub progress: f64,
    pub status: ProcessingStatus,
    pub stage: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_urls: Option<DownloadUrls>,
}

impl ProgressSnapshot {
    /// Decode the status endpoint body. Missing or mistyped fields fall back
    /// to defaults instead of failing.
    pub fn from_value(value: &Value) -> Self {
        let progress = match value.get("progress") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let text = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        ProgressSnapshot {
            progress,
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(ProcessingStatus::from)
                .unwrap_or_default(),
            stage: text("current_stage"),
            message: text("message"),
            download_urls: value.get("download_urls").and_then(DownloadUrls::from_value),
        }
    }
}

/// What a listener renders on each update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DisplayState {
    pub job_id: Option<String>,
    pub status: ProcessingStatus,
    pub stage: String,
    pub message: String,
    /// Smoothed value for animation.
    pub display_progress: f64,
    /// Last progress reported by the backend.
    pub progress: f64,
    pub download_urls: Option<DownloadUrls>,
}

/// Handed to `on_complete` once per session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionSummary {
    pub status: ProcessingStatus,
    pub progress: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_urls: Option<DownloadUrls>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_display_matches_wire_strings() {
        assert_eq!(ProcessingStatus::Preparing.to_string(), "preparing");
        assert_eq!(ProcessingStatus::Downloading.to_string(), "downloading");
        assert_eq!(ProcessingStatus::Processing.to_string(), "processing");
        assert_eq!(ProcessingStatus::Completed.to_string(), "completed");
        assert_eq!(ProcessingStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn unknown_status_defaults_to_preparing() {
        let status: ProcessingStatus = "queued".to_string().into();
        assert_eq!(status, ProcessingStatus::Preparing);
        assert_eq!(ProcessingStatus::from("COMPLETED"), ProcessingStatus::Completed);
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(!ProcessingStatus::Preparing.is_terminal());
    }

    #[test]
    fn snapshot_reads_backend_shape() {
        let snapshot = ProgressSnapshot::from_value(&json!({
            "processing_id": "abc",
            "status": "completed",
            "progress": 100,
            "current_stage": "done",
            "message": "finished",
            "download_urls": {
                "original": "/api/download/original/abc",
                "processed": "/api/download/processed/abc",
                "package": "/api/download/package/abc"
            }
        }));

        assert_eq!(snapshot.status, ProcessingStatus::Completed);
        assert_eq!(snapshot.progress, 100.0);
        assert_eq!(snapshot.stage, "done");
        assert_eq!(snapshot.message, "finished");
        let urls = snapshot.download_urls.unwrap();
        assert_eq!(urls.original.as_deref(), Some("/api/download/original/abc"));
        assert_eq!(urls.package.as_deref(), Some("/api/download/package/abc"));
    }

    #[test]
    fn snapshot_tolerates_missing_and_mistyped_fields() {
        let snapshot = ProgressSnapshot::from_value(&json!({
            "progress": "not a number",
            "status": 7,
            "message": null,
            "download_urls": {"original": 3}
        }));
        assert_eq!(snapshot, ProgressSnapshot::default());

        let empty = ProgressSnapshot::from_value(&json!([]));
        assert_eq!(empty, ProgressSnapshot::default());
    }

    #[test]
    fn snapshot_clamps_progress() {
        assert_eq!(ProgressSnapshot::from_value(&json!({"progress": 140})).progress, 100.0);
        assert_eq!(ProgressSnapshot::from_value(&json!({"progress": -3})).progress, 0.0);
        assert_eq!(ProgressSnapshot::from_value(&json!({"progress": "42.5"})).progress, 42.5);
    }

    #[test]
    fn urls_in_trigger_order() {
        let urls = DownloadUrls {
            original: Some("/a".into()),
            processed: Some("/b".into()),
            package: Some("/c".into()),
        };
        assert_eq!(
            urls.in_order(false),
            vec![(ArtifactKind::Original, "/a"), (ArtifactKind::Processed, "/b")]
        );
        assert_eq!(urls.in_order(true).len(), 3);

        let processed_only = DownloadUrls {
            processed: Some("/b".into()),
            ..Default::default()
        };
        assert_eq!(processed_only.in_order(true), vec![(ArtifactKind::Processed, "/b")]);
    }
}
