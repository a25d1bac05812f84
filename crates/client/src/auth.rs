//! Token acquisition and validation.

use chatdash_core::{AccountInfo, AuthStatus, LoginRequest, TokenPair};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

impl ApiClient {
    /// Exchanges username and password for a token pair (`POST /auth/token`).
    ///
    /// # Errors
    /// `Unauthorized` for bad credentials, otherwise any transport or parse failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ClientError> {
        if username.trim().is_empty() {
            return Err(ClientError::InvalidInput("username must not be empty".to_owned()));
        }
        let request =
            LoginRequest { username: username.trim().to_owned(), password: password.to_owned() };
        let tokens: TokenPair = self.post_json("/auth/token", Some(&request)).await?;
        tracing::info!(username = %request.username, "logged in");
        Ok(tokens)
    }

    /// Trades a refresh token for a fresh pair (`POST /auth/refresh`).
    ///
    /// # Errors
    /// `Unauthorized` when the refresh token is no longer valid.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        self.post_json("/auth/refresh", Some(&RefreshRequest { refresh_token })).await
    }

    /// Validates the session's token against the protected-resource check (`GET /protected`).
    ///
    /// # Errors
    /// `Unauthorized` when the token is absent or rejected.
    pub async fn check_auth(&self) -> Result<AuthStatus, ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::Unauthorized { code: 401 });
        }
        self.get_json("/protected", &[]).await
    }

    /// Name and company of the logged-in account (`GET /api/accounts/info`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn account_info(&self) -> Result<AccountInfo, ClientError> {
        self.get_json("/api/accounts/info", &[]).await
    }
}
