//! Conversation sidebar helpers: titles, timestamps and export

mod export;

pub use export::{export, ExportFormat};

use crate::api::types::ConversationMessage;
use crate::constants::{DEFAULT_CONVERSATION_TITLE, TITLE_MAX_CHARS};
use chrono::{DateTime, Local, Utc};

/// Title shown for a conversation without a custom one: the first user
/// message, cut to 50 characters.
pub fn derive_title(messages: &[ConversationMessage]) -> String {
    let Some(first) = messages.iter().find(|m| m.role == "user") else {
        return DEFAULT_CONVERSATION_TITLE.to_string();
    };
    let content = first.content.trim();
    if content.chars().count() > TITLE_MAX_CHARS {
        let cut: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        content.to_string()
    }
}

/// Local time for a unix-seconds timestamp; `-` when unknown.
pub fn format_timestamp(ts: f64) -> String {
    if !ts.is_finite() || ts <= 0.0 {
        return "-".to_string();
    }
    let secs = ts.trunc() as i64;
    let nanos = (ts.fract() * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: &str, content: &str) -> ConversationMessage {
        ConversationMessage {
            role: role.to_string(),
            content: content.to_string(),
            timestamp: 0.0,
        }
    }

    #[test]
    fn title_uses_first_user_message() {
        let messages = vec![
            message("assistant", "Hello"),
            message("user", "Plan a flood monitoring constellation"),
            message("user", "Second question"),
        ];
        assert_eq!(derive_title(&messages), "Plan a flood monitoring constellation");
    }

    #[test]
    fn long_titles_are_cut_on_char_boundaries() {
        let long = "卫".repeat(60);
        let title = derive_title(&[message("user", &long)]);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn empty_conversation_gets_default_title() {
        assert_eq!(derive_title(&[]), DEFAULT_CONVERSATION_TITLE);
        assert_eq!(derive_title(&[message("assistant", "hi")]), DEFAULT_CONVERSATION_TITLE);
    }

    #[test]
    fn unknown_timestamps_render_as_dash() {
        assert_eq!(format_timestamp(0.0), "-");
        assert_eq!(format_timestamp(f64::NAN), "-");
        assert_ne!(format_timestamp(1_700_000_000.5), "-");
    }
}
