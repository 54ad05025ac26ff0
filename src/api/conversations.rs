use super::client::{segment, ApiClient};
use super::types::{Conversation, ConversationList, CreateRequest, RenameRequest, Renamed};
use crate::error::ApiError;
use log::info;

/// The backend accepts 1..=100 per page.
const MAX_PAGE_SIZE: u32 = 100;

impl ApiClient {
    pub async fn list_conversations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ConversationList, ApiError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let url = self.url(&format!("/api/conversations?limit={}&offset={}", limit, offset));
        let response = self.http().get(url).send().await?;
        Self::read_json(response).await
    }

    /// Title the sidebar shows for `conversation_id`, custom titles included.
    ///
    /// Only the list route reports renamed titles, so this pages through it.
    /// `None` when the conversation is not listed.
    pub async fn conversation_title(
        &self,
        conversation_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let mut offset = 0;
        loop {
            let page = self.list_conversations(MAX_PAGE_SIZE, offset).await?;
            if let Some(item) = page
                .conversations
                .iter()
                .find(|c| c.conversation_id == conversation_id)
            {
                return Ok(Some(item.title.clone()));
            }
            offset += MAX_PAGE_SIZE;
            if page.conversations.is_empty() || u64::from(offset) >= page.total {
                return Ok(None);
            }
        }
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation, ApiError> {
        let url = self.url(&format!("/api/conversation/{}", segment(conversation_id)));
        let response = self.http().get(url).send().await?;
        Self::read_json(response).await
    }

    /// Rename a conversation. The title is trimmed and must not be empty.
    pub async fn rename_conversation(
        &self,
        conversation_id: &str,
        title: &str,
    ) -> Result<Renamed, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::InvalidInput("title must not be empty".to_string()));
        }

        let url = self.url(&format!(
            "/api/conversation/{}/rename",
            segment(conversation_id)
        ));
        let response = self
            .http()
            .patch(url)
            .json(&RenameRequest { title })
            .send()
            .await?;
        let renamed: Renamed = Self::read_json(response).await?;
        info!("conversation_renamed: {} -> {}", renamed.conversation_id, renamed.new_title);
        Ok(renamed)
    }

    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/conversation/{}", segment(conversation_id)));
        let response = self.http().delete(url).send().await?;
        let _: serde_json::Value = Self::read_json(response).await?;
        info!("conversation_deleted: {}", conversation_id);
        Ok(())
    }

    /// Create an empty conversation under a caller-chosen id.
    pub async fn create_conversation(&self, conversation_id: &str) -> Result<Conversation, ApiError> {
        if conversation_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("conversation id must not be empty".to_string()));
        }
        let response = self
            .http()
            .post(self.url("/api/conversation/create"))
            .json(&CreateRequest { conversation_id })
            .send()
            .await?;
        Self::read_json(response).await
    }
}
