//! Request and response payloads of the backend routes

use serde::{Deserialize, Serialize};

/// Body of `POST /api/process-data`
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingRequest {
    pub conversation_id: String,
    pub selected_satellites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProcessingStarted {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub processing_id: Option<String>,
    #[serde(default)]
    pub progress_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ConversationListItem {
    pub conversation_id: String,
    #[serde(default)]
    pub title: String,
    /// Unix seconds
    #[serde(default)]
    pub created_at: f64,
    #[serde(default)]
    pub updated_at: f64,
    #[serde(default)]
    pub message_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<ConversationListItem>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ConversationMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConversationMetadata {
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

/// `GET /api/conversation/{id}`; `message` is the last assistant reply.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Conversation {
    pub conversation_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub metadata: Option<ConversationMetadata>,
}

impl Conversation {
    pub fn messages(&self) -> &[ConversationMessage] {
        self.metadata
            .as_ref()
            .map(|m| m.messages.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Renamed {
    pub conversation_id: String,
    pub new_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateRequest<'a> {
    pub conversation_id: &'a str,
}
