//! HTTP client for the assistant backend
//!
//! Covers the routes the monitor and the CLI need:
//! - Processing progress polling and job start
//! - Conversation list, detail, rename, delete and create

mod client;
mod conversations;
mod progress;
pub mod types;

pub use client::ApiClient;
