//! Bearer token persisted between invocations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chatdash_core::{ENV_TOKEN_FILE, TokenPair};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<TokenPair> for StoredToken {
    fn from(pair: TokenPair) -> Self {
        Self { access_token: pair.access_token, refresh_token: pair.refresh_token }
    }
}

/// `CHATDASH_TOKEN_FILE`, else `<data_local_dir>/chatdash/token.json`.
pub(crate) fn default_token_path() -> PathBuf {
    std::env::var_os(ENV_TOKEN_FILE).filter(|p| !p.is_empty()).map_or_else(
        || {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("chatdash")
                .join("token.json")
        },
        PathBuf::from,
    )
}

#[derive(Debug, Clone)]
pub(crate) struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nobody has logged in yet.
    pub(crate) fn load(&self) -> Result<Option<StoredToken>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            },
        };
        let token: StoredToken = serde_json::from_str(&raw)
            .with_context(|| format!("token file {} is corrupt; log in again", self.path.display()))?;
        if token.access_token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(token))
    }

    pub(crate) fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("writing {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    /// Returns whether a token file was there to remove.
    pub(crate) fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restricting permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
