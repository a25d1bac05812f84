use std::time::Duration;

use chatdash_core::env_config::timeout_secs_from_env;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::session::Session;

/// Maximum number of body bytes quoted in error messages.
pub const MAX_ERROR_BODY_LEN: usize = 200;

/// Client for the admin API. Every request carries the session's bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) session: Session,
}

impl ApiClient {
    /// Creates a client with the timeout from `CHATDASH_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(session: Session) -> Result<Self, ClientError> {
        Self::with_timeout(session, Duration::from_secs(timeout_secs_from_env()))
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn with_timeout(session: Session, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;
        Ok(Self { client, session })
    }

    /// Same connection pool, different credential (used right after login).
    #[must_use]
    pub fn with_session(&self, session: Session) -> Self {
        Self { client: self.client.clone(), session }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.session.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::GET, path).query(query);
        self.send(builder, path).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, path).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, ClientError> {
        tracing::debug!(path, "api request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!(path, status = status.as_u16(), "credential rejected");
            return Err(ClientError::Unauthorized { code: status.as_u16() });
        }
        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
            tracing::warn!(path, status = status.as_u16(), %message, "api request failed");
            return Err(ClientError::HttpStatus { code: status.as_u16(), message });
        }

        let payload = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(payload).map_err(|e| ClientError::JsonParse {
            context: format!("{path} response (body: {})", truncate(&body, MAX_ERROR_BODY_LEN)),
            source: e,
        })
    }
}

/// Human-readable text from an error body: its `error` or `detail` field,
/// else the raw body. `None` for an empty body.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "detail", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => {},
                Some(other) => return Some(other.to_string()),
            }
        }
    }
    Some(truncate(trimmed, MAX_ERROR_BODY_LEN).to_owned())
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
