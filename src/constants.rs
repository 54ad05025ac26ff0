//! Defaults shared by the library and the CLI

use std::time::Duration;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:2025";

/// Status endpoint cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Display smoothing cadence.
pub const SMOOTHING_INTERVAL: Duration = Duration::from_millis(100);

/// Gap between consecutive artifact downloads of one completion.
pub const SECOND_DOWNLOAD_DELAY: Duration = Duration::from_millis(600);

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Smoothed progress never shows more than this before the job completes.
pub const DISPLAY_CEILING: f64 = 99.0;

/// Minimum smoothing step, in percentage points.
pub const MIN_SMOOTHING_STEP: f64 = 0.5;

/// Fraction of the remaining gap covered per smoothing tick.
pub const SMOOTHING_FACTOR: f64 = 0.25;

pub const ENV_API_BASE: &str = "PROGRESS_MONITOR_API_BASE";
pub const ENV_POLL_MS: &str = "PROGRESS_MONITOR_POLL_MS";
pub const ENV_TIMEOUT_SECS: &str = "PROGRESS_MONITOR_TIMEOUT_SECS";
pub const ENV_OUTPUT_DIR: &str = "PROGRESS_MONITOR_OUTPUT_DIR";

/// Conversation titles derived from the first user message are cut here.
pub const TITLE_MAX_CHARS: usize = 50;

pub const DEFAULT_CONVERSATION_TITLE: &str = "New conversation";
