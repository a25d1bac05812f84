//! Resolved runtime settings: flags first, then environment, then defaults.

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chatdash_client::{ApiClient, Session};
use chatdash_core::env_config::page_size_from_env;
use chatdash_core::{ENV_TOKEN, page_size};
use chatdash_render::OutputFormat;

use crate::token_store::{StoredToken, TokenStore, default_token_path};

/// Where the access token came from.
#[derive(Debug, Clone)]
pub(crate) enum Credential {
    /// `CHATDASH_TOKEN`; never refreshed, the token file is left alone.
    Env(String),
    /// The token file written by `login`.
    Stored(StoredToken),
}

impl Credential {
    pub(crate) fn access_token(&self) -> &str {
        match self {
            Self::Env(token) => token,
            Self::Stored(stored) => &stored.access_token,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub base_url: String,
    pub page_size: NonZeroU32,
    pub format: OutputFormat,
    pub token_path: PathBuf,
}

impl Settings {
    pub(crate) fn resolve(
        base_url: String,
        page_size_flag: Option<u32>,
        format: OutputFormat,
    ) -> Result<Self> {
        let raw_size = page_size_flag.unwrap_or_else(page_size_from_env);
        let page_size = page_size(u64::from(raw_size)).context("--page-size")?;
        Ok(Self { base_url, page_size, format, token_path: default_token_path() })
    }

    pub(crate) fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.token_path)
    }

    /// Client with no credential, for `login`.
    pub(crate) fn anonymous_client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(Session::anonymous(&self.base_url)?)?)
    }

    /// The credential to use: `CHATDASH_TOKEN` wins over the token file.
    pub(crate) fn credential(&self) -> Result<Option<Credential>> {
        if let Some(token) = std::env::var(ENV_TOKEN).ok().filter(|t| !t.trim().is_empty()) {
            return Ok(Some(Credential::Env(token)));
        }
        Ok(self.token_store().load()?.map(Credential::Stored))
    }
}
