//! Processing job monitor and conversation client for the assistant backend

pub mod api;
pub mod commands;
pub mod config;
pub mod constants;
pub mod conversations;
pub mod error;
pub mod logging;
pub mod progress;

pub use api::ApiClient;
pub use config::MonitorConfig;
pub use error::{ApiError, ConfigError, PollError};
pub use progress::{MonitorListener, ProgressMonitor, SessionEnd};
