//! Typed error enum for the API client.

use thiserror::Error;

/// Errors from admin API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {message}")]
    HttpStatus { code: u16, message: String },
    #[error("not authorized (HTTP {code}): token missing, expired or rejected")]
    Unauthorized { code: u16 },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing field in response: {0}")]
    MissingField(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// The backend rejected the credential; the caller has to log in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status code, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } | Self::Unauthorized { code } => Some(*code),
            Self::HttpRequest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<chatdash_core::CoreError> for ClientError {
    fn from(err: chatdash_core::CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
