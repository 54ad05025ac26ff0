use super::types::{CompletionSummary, DisplayState, ProcessingStatus};
use crate::error::PollError;
use log::{info, warn};
use std::sync::Mutex;

/// Observer of one monitor. Callbacks run on runtime worker threads and
/// must not block.
pub trait MonitorListener: Send + Sync {
    /// Called after every applied snapshot and every smoothing step that moved.
    fn on_update(&self, _state: &DisplayState) {}

    /// Called once per session, from its own task, after the job completes.
    fn on_complete(&self, summary: CompletionSummary);

    /// Called once when a poll fails; the session stops polling afterwards.
    fn on_error(&self, error: &PollError);
}

/// Logs status changes instead of drawing a bar. Used for non-interactive output.
#[derive(Debug, Default)]
pub struct LogListener {
    last: Mutex<Option<(ProcessingStatus, String)>>,
}

impl LogListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MonitorListener for LogListener {
    fn on_update(&self, state: &DisplayState) {
        let key = (state.status, state.stage.clone());
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if last.as_ref() == Some(&key) {
            return;
        }
        info!(
            "job_status: {} -> {} stage={:?} progress={} message={:?}",
            state.job_id.as_deref().unwrap_or("-"),
            state.status,
            state.stage,
            state.progress,
            state.message
        );
        *last = Some(key);
    }

    fn on_complete(&self, summary: CompletionSummary) {
        info!("job_complete: {}", summary.message);
    }

    fn on_error(&self, error: &PollError) {
        warn!("job_poll_failed: {}", error);
    }
}
