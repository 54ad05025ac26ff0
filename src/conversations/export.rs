use super::format_timestamp;
use crate::api::types::{Conversation, ConversationMessage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    conversation_id: &'a str,
    title: &'a str,
    exported_at: String,
    messages: &'a [ConversationMessage],
}

/// Render a conversation for saving or sharing.
pub fn export(
    conversation: &Conversation,
    title: &str,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let messages = conversation.messages();
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(&JsonExport {
            conversation_id: &conversation.conversation_id,
            title,
            exported_at: exported_at.to_rfc3339(),
            messages,
        }),
        ExportFormat::Markdown => Ok(markdown(title, messages, exported_at)),
        ExportFormat::Text => Ok(text(title, messages, exported_at)),
    }
}

fn role_label(role: &str) -> String {
    match role {
        "user" => "User".to_string(),
        "assistant" => "Assistant".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Unknown".to_string(),
            }
        }
    }
}

fn markdown(title: &str, messages: &[ConversationMessage], exported_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", title);
    let _ = writeln!(out);
    let _ = writeln!(out, "_Exported {}_", exported_at.format("%Y-%m-%d %H:%M:%S UTC"));

    for message in messages {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "## {} ({})",
            role_label(&message.role),
            format_timestamp(message.timestamp)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", message.content.trim_end());
    }
    out
}

fn text(title: &str, messages: &[ConversationMessage], exported_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "Exported {}", exported_at.format("%Y-%m-%d %H:%M:%S UTC"));

    for message in messages {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            format_timestamp(message.timestamp),
            role_label(&message.role),
            message.content.trim_end()
        );
    }
    out
}
