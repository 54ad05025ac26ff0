use super::client::{segment, ApiClient};
use super::types::{ProcessingRequest, ProcessingStarted};
use crate::error::{error_detail, ApiError, PollError};
use crate::progress::ProgressSnapshot;
use log::debug;

impl ApiClient {
    /// `GET /api/processing-progress/{job_id}`
    pub async fn fetch_progress(&self, job_id: &str) -> Result<ProgressSnapshot, PollError> {
        let url = self.url(&format!("/api/processing-progress/{}", segment(job_id)));
        let response = self.http().get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PollError::Status {
                code: status.as_u16(),
                body: error_detail(&body),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let snapshot = ProgressSnapshot::from_value(&value);
        debug!(
            "progress_poll: {} status={} progress={}",
            job_id, snapshot.status, snapshot.progress
        );
        Ok(snapshot)
    }

    /// `POST /api/process-data`
    pub async fn start_processing(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessingStarted, ApiError> {
        if request.selected_satellites.is_empty() {
            return Err(ApiError::InvalidInput(
                "at least one satellite must be selected".to_string(),
            ));
        }
        let response = self
            .http()
            .post(self.url("/api/process-data"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
