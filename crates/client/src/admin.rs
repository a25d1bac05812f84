//! One-shot admin pages: chats, users and prompts, plus their save handlers.

use chatdash_core::{
    AutomaticPrompt, Chat, ChatPromptUpdate, ChatSchedule, Prompt, User, UserPrompts, UserRename,
};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::listings::path_segment;

impl ApiClient {
    /// Every chat the bot knows about (`GET /api/chats`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.get_json("/api/chats", &[]).await
    }

    /// Asks the backend to resync chat metadata from Telegram (`POST /api/chats/update`).
    ///
    /// # Errors
    /// Any transport or status failure.
    pub async fn refresh_chats(&self) -> Result<Value, ClientError> {
        self.post_json::<(), Value>("/api/chats/update", None).await
    }

    /// Stores a chat's scheduled-analysis settings (`POST /api/chats/{id}/schedule`).
    ///
    /// # Errors
    /// `InvalidInput` for a malformed chat id, otherwise any transport or status failure.
    pub async fn save_chat_schedule(
        &self,
        chat_id: &str,
        schedule: &ChatSchedule,
    ) -> Result<Value, ClientError> {
        let id = path_segment("chat", chat_id)?;
        let reply = self.post_json(&format!("/api/chats/{id}/schedule"), Some(schedule)).await?;
        tracing::info!(chat_id = id, enabled = schedule.schedule_analysis, "chat schedule saved");
        Ok(reply)
    }

    /// Sets a chat's default prompt (`POST /update_chat_prompt`).
    ///
    /// # Errors
    /// Any transport or status failure; the backend's `error` text is kept.
    pub async fn update_chat_prompt(
        &self,
        chat_id: &str,
        prompt_id: &str,
    ) -> Result<Value, ClientError> {
        let body = ChatPromptUpdate {
            chat_id: path_segment("chat", chat_id)?.to_owned(),
            prompt_id: path_segment("prompt", prompt_id)?.to_owned(),
        };
        self.post_json("/update_chat_prompt", Some(&body)).await
    }

    /// Every chat member known to the bot (`GET /api/users`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/api/users", &[]).await
    }

    /// Asks the backend to resync users (`POST /api/users/update`).
    ///
    /// # Errors
    /// Any transport or status failure.
    pub async fn refresh_users(&self) -> Result<Value, ClientError> {
        self.post_json::<(), Value>("/api/users/update", None).await
    }

    /// Changes a user's display name (`POST /users/{id}/edit`).
    ///
    /// # Errors
    /// `InvalidInput` for a malformed id, otherwise any transport or status failure.
    pub async fn rename_user(&self, user_id: &str, username: &str) -> Result<Value, ClientError> {
        let id = path_segment("user", user_id)?;
        let body = UserRename { username: username.trim().to_owned() };
        self.post_json(&format!("/users/{id}/edit"), Some(&body)).await
    }

    /// Every prompt template (`GET /api/prompts`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn prompts(&self) -> Result<Vec<Prompt>, ClientError> {
        self.get_json("/api/prompts", &[]).await
    }

    /// Prompts visible to the current account (`GET /user_prompts`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn user_prompts(&self) -> Result<Vec<Prompt>, ClientError> {
        let wrapped: UserPrompts = self.get_json("/user_prompts", &[]).await?;
        Ok(wrapped.prompt_data)
    }

    /// The account's default prompt, if one is configured (`GET /get_automatic_prompt`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn automatic_prompt(&self) -> Result<Option<String>, ClientError> {
        let reply: AutomaticPrompt = self.get_json("/get_automatic_prompt", &[]).await?;
        Ok(reply.prompt_id)
    }
}
