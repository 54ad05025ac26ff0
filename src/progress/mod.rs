//! Processing job monitor
//!
//! Polls the backend for one job at a time and drives a listener with:
//! - Authoritative status, stage and message from each snapshot
//! - A smoothed display value for animation
//! - A one-shot completion handler (artifact downloads, then `on_complete`)
//! - Full reset when the monitor is hidden

mod listener;
mod monitor;
mod session;
pub mod smoothing;
mod trigger;
mod types;

pub use listener::{LogListener, MonitorListener};
pub use monitor::{ProgressMonitor, SessionEnd};
pub use session::{MonitorSession, Transition};
pub use trigger::{ArtifactDownloads, DownloadTrigger, SkipDownloads};
pub use types::{
    ArtifactKind, CompletionSummary, DisplayState, DownloadUrls, ProcessingStatus,
    ProgressSnapshot,
};
