use crate::error::PollError;
use crate::progress::{CompletionSummary, DisplayState, MonitorListener, ProcessingStatus};
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar driven by the monitor's display state.
pub(crate) struct ProgressBarListener {
    pb: ProgressBar,
}

impl ProgressBarListener {
    pub(crate) fn new(job_id: &str) -> Self {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos:>3}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_prefix(job_id.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { pb }
    }
}

impl MonitorListener for ProgressBarListener {
    fn on_update(&self, state: &DisplayState) {
        self.pb.set_position(state.display_progress.round() as u64);
        let text = if state.message.is_empty() {
            state.stage.clone()
        } else {
            state.message.clone()
        };
        self.pb.set_message(format!("{} {}", state.status, text));
        if state.status == ProcessingStatus::Failed {
            self.pb.abandon();
        }
    }

    fn on_complete(&self, summary: CompletionSummary) {
        self.pb.set_position(100);
        self.pb.finish_with_message(summary.message);
    }

    fn on_error(&self, error: &PollError) {
        self.pb.abandon_with_message(format!("polling stopped: {}", error));
    }
}
