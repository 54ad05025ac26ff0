use super::ConversationCommands;
use crate::api::ApiClient;
use crate::config::MonitorConfig;
use crate::conversations::{derive_title, export, format_timestamp};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::process::ExitCode;

pub(super) async fn run(config: &MonitorConfig, command: ConversationCommands) -> Result<ExitCode> {
    let client = ApiClient::new(config).context("failed to build HTTP client")?;

    match command {
        ConversationCommands::List { limit, offset } => {
            let list = client
                .list_conversations(limit, offset)
                .await
                .context("failed to list conversations")?;
            for item in &list.conversations {
                println!(
                    "{}  {}  {} messages  {}",
                    item.conversation_id,
                    format_timestamp(item.updated_at),
                    item.message_count,
                    item.title
                );
            }
            println!("{} of {} conversations", list.conversations.len(), list.total);
        }
        ConversationCommands::Show { conversation_id } => {
            let conversation = client
                .get_conversation(&conversation_id)
                .await
                .with_context(|| format!("failed to load conversation {}", conversation_id))?;
            println!("{}", derive_title(conversation.messages()));
            for message in conversation.messages() {
                println!();
                println!("[{}] {}:", format_timestamp(message.timestamp), message.role);
                println!("{}", message.content.trim_end());
            }
        }
        ConversationCommands::Rename {
            conversation_id,
            title,
        } => {
            let renamed = client
                .rename_conversation(&conversation_id, &title)
                .await
                .with_context(|| format!("failed to rename conversation {}", conversation_id))?;
            println!("{} renamed to {}", renamed.conversation_id, renamed.new_title);
        }
        ConversationCommands::Delete { conversation_id } => {
            client
                .delete_conversation(&conversation_id)
                .await
                .with_context(|| format!("failed to delete conversation {}", conversation_id))?;
            println!("{} deleted", conversation_id);
        }
        ConversationCommands::Create { conversation_id } => {
            let created = client
                .create_conversation(&conversation_id)
                .await
                .with_context(|| format!("failed to create conversation {}", conversation_id))?;
            println!("{} created", created.conversation_id);
        }
        ConversationCommands::Export {
            conversation_id,
            format,
            title,
            out,
        } => {
            let conversation = client
                .get_conversation(&conversation_id)
                .await
                .with_context(|| format!("failed to load conversation {}", conversation_id))?;
            let title = match title {
                Some(title) => title,
                None => client
                    .conversation_title(&conversation_id)
                    .await
                    .with_context(|| format!("failed to look up title of {}", conversation_id))?
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| derive_title(conversation.messages())),
            };
            let rendered = export(&conversation, &title, format, Utc::now())?;

            let out = out.unwrap_or_else(|| {
                PathBuf::from(format!("{}.{}", conversation_id, format.extension()))
            });
            if out.as_os_str() == "-" {
                print!("{}", rendered);
            } else {
                tokio::fs::write(&out, rendered)
                    .await
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("exported to {}", out.display());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
