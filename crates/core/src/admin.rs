//! Chats, users, prompts and account records used by the one-shot admin pages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::json_utils::{deserialize_id, deserialize_opt_id};

/// Telegram chat the bot is a member of (`/api/chats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(deserialize_with = "deserialize_id")]
    pub chat_id: String,
    #[serde(default)]
    pub chat_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub default_prompt_id: Option<String>,
    #[serde(default)]
    pub schedule_analysis: bool,
    #[serde(default)]
    pub analysis_time: Option<String>,
    #[serde(default)]
    pub send_time: Option<String>,
}

impl Chat {
    #[must_use]
    pub fn analysis_hour(&self) -> Option<HourOfDay> {
        self.analysis_time.as_deref().and_then(HourOfDay::from_time)
    }

    #[must_use]
    pub fn send_hour(&self) -> Option<HourOfDay> {
        self.send_time.as_deref().and_then(HourOfDay::from_time)
    }
}

/// Whole hour used by the scheduled-analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// # Errors
    /// Returns `CoreError::InvalidHour` outside `0..=23`.
    pub fn new(hour: u32) -> Result<Self> {
        u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .map(Self)
            .ok_or(CoreError::InvalidHour(hour))
    }

    /// Reads the hour from a stored `HH:MM[:SS]` value.
    #[must_use]
    pub fn from_time(raw: &str) -> Option<Self> {
        let hour = raw.trim().split(':').next()?;
        hour.parse::<u32>().ok().and_then(|h| Self::new(h).ok())
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `HH:00`, the form the schedule endpoint stores.
    #[must_use]
    pub fn as_time(self) -> String {
        format!("{:02}:00", self.0)
    }
}

/// Body of `POST /api/chats/{id}/schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSchedule {
    pub prompt_id: Option<String>,
    pub schedule_analysis: bool,
    pub analysis_time: String,
    pub send_time: String,
}

impl ChatSchedule {
    #[must_use]
    pub fn new(
        prompt_id: Option<String>,
        enabled: bool,
        analysis_hour: HourOfDay,
        send_hour: HourOfDay,
    ) -> Self {
        Self {
            prompt_id,
            schedule_analysis: enabled,
            analysis_time: analysis_hour.as_time(),
            send_time: send_hour.as_time(),
        }
    }
}

/// Body of `POST /update_chat_prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPromptUpdate {
    pub chat_id: String,
    pub prompt_id: String,
}

/// Chat member known to the bot (`/api/users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `POST /users/{id}/edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRename {
    pub username: String,
}

/// Analysis prompt template (`/api/prompts`, `/user_prompts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    #[serde(deserialize_with = "deserialize_id")]
    pub prompt_id: String,
    #[serde(default)]
    pub prompt_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/user_prompts` wraps its list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPrompts {
    #[serde(default)]
    pub prompt_data: Vec<Prompt>,
}

/// `/get_automatic_prompt`: the company's default prompt, if set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutomaticPrompt {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub prompt_id: Option<String>,
}

/// `/api/accounts/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// `/protected`: who the token belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub logged_in_as: Option<Value>,
}

impl AuthStatus {
    /// Printable identity regardless of whether the backend sends a name or an object.
    #[must_use]
    pub fn identity(&self) -> Option<String> {
        match self.logged_in_as.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Credentials posted to `/auth/token`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Tokens issued by `/auth/token` and `/auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// `/api/download`: presigned URL for an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadLink {
    #[serde(default)]
    pub url: Option<String>,
}
