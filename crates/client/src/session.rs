use crate::error::ClientError;

/// Credential plus API location, handed to [`crate::ApiClient::new`].
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Session {
    /// Session carrying a bearer token.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` for a blank URL or token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::InvalidInput("token must not be empty".to_owned()));
        }
        let mut session = Self::anonymous(base_url)?;
        session.token = Some(token.trim().to_owned());
        Ok(session)
    }

    /// Session without a credential, for the login endpoints.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` for a blank URL.
    pub fn anonymous(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ClientError::InvalidInput("base URL must not be empty".to_owned()));
        }
        Ok(Self { base_url, token: None })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL for an API path (`/api/logs`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let session = Session::new("http://host:8000/", "t").unwrap();
        assert_eq!(session.url("/api/logs"), "http://host:8000/api/logs");
        assert_eq!(session.url("protected"), "http://host:8000/protected");
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(Session::new("http://host", "  ").is_err());
        assert!(Session::anonymous("").is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new("http://host", "very-secret").unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("http://host"));
    }
}
