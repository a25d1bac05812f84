//! Rows returned by the paginated listings.
//!
//! Fields the dashboards display are typed; everything else the backend sends
//! is kept in `extra` so a row survives a round trip unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json_utils::{deserialize_id, deserialize_opt_id, parse_timestamp};

/// Application log line (`/api/logs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEntry {
    #[must_use]
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// One stored analysis in the history list (`/analysis/all`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub analysis_id: String,
    #[serde(default)]
    pub prompt_name: Option<String>,
    #[serde(default)]
    pub filters: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisSummary {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Chat message collected by the bot (`/api/messages`, `/api/analyze`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    #[must_use]
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Key of the attached file in object storage, if any.
    #[must_use]
    pub fn attachment(&self) -> Option<&str> {
        self.s3_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}
