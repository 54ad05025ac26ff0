//! Per-session display state and its transition table
//!
//! Every mutation carries the generation it was started under. `begin` and
//! `end` bump the generation, so work belonging to an earlier session is
//! ignored instead of leaking into the next one.

use super::smoothing::next_display;
use super::types::{CompletionSummary, DisplayState, DownloadUrls, ProcessingStatus, ProgressSnapshot};

/// Outcome of applying one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The snapshot belongs to a session that is no longer current.
    Stale,
    /// Non-terminal update; keep polling.
    Progress,
    /// First `completed` of this session; run the completion handler.
    Completed(CompletionSummary),
    /// `completed` again after the handler already ran.
    AlreadyCompleted,
    Failed,
}

#[derive(Debug, Default)]
pub struct MonitorSession {
    generation: u64,
    job_id: Option<String>,
    status: ProcessingStatus,
    progress: f64,
    stage: String,
    message: String,
    download_urls: Option<DownloadUrls>,
    display_progress: f64,
    completion_fired: bool,
}

impl MonitorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session for `job_id` and return its generation.
    pub fn begin(&mut self, job_id: &str) -> u64 {
        self.clear();
        self.generation += 1;
        self.job_id = Some(job_id.to_string());
        self.generation
    }

    /// Drop the current session. Anything still running for it goes stale.
    pub fn end(&mut self) {
        self.clear();
        self.generation += 1;
    }

    fn clear(&mut self) {
        self.job_id = None;
        self.status = ProcessingStatus::Preparing;
        self.progress = 0.0;
        self.stage.clear();
        self.message.clear();
        self.download_urls = None;
        self.display_progress = 0.0;
        self.completion_fired = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.job_id.is_some() && self.generation == generation
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn apply(&mut self, generation: u64, snapshot: ProgressSnapshot) -> Transition {
        if !self.is_current(generation) {
            return Transition::Stale;
        }

        self.status = snapshot.status;
        self.progress = snapshot.progress;
        self.stage = snapshot.stage;
        self.message = snapshot.message;
        if snapshot.download_urls.is_some() {
            self.download_urls = snapshot.download_urls;
        }

        match self.status {
            ProcessingStatus::Completed => {
                self.display_progress = 100.0;
                if self.completion_fired {
                    return Transition::AlreadyCompleted;
                }
                self.completion_fired = true;
                Transition::Completed(CompletionSummary {
                    status: ProcessingStatus::Completed,
                    progress: 100.0,
                    message: self.message.clone(),
                    download_urls: self.download_urls.clone(),
                })
            }
            ProcessingStatus::Failed => Transition::Failed,
            _ => Transition::Progress,
        }
    }

    /// One smoothing tick. Returns whether the displayed value moved.
    pub fn tick(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) || self.status.is_terminal() {
            return false;
        }
        let next = next_display(self.display_progress, self.progress);
        let moved = next != self.display_progress;
        self.display_progress = next;
        moved
    }

    pub fn display(&self) -> DisplayState {
        DisplayState {
            job_id: self.job_id.clone(),
            status: self.status,
            stage: self.stage.clone(),
            message: self.message.clone(),
            display_progress: self.display_progress,
            progress: self.progress,
            download_urls: self.download_urls.clone(),
        }
    }
}
