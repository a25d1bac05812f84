use std::io::{BufRead, IsTerminal};

use anyhow::{Context, Result, anyhow, bail};
use chatdash_client::{ApiClient, Session};
use chatdash_render::{Table, TableRenderer};

use crate::config::{Credential, Settings};
use crate::token_store::StoredToken;

const NOT_LOGGED_IN: &str = "not logged in; run `chatdash login` first";
const SESSION_EXPIRED: &str = "session expired, log in again";

/// Client carrying a credential the backend still accepts.
///
/// Fails with "not logged in" when there is no token and with "session
/// expired" when the backend rejects it and it cannot be refreshed.
pub(crate) async fn authorized_client(settings: &Settings) -> Result<ApiClient> {
    let credential = settings.credential()?.ok_or_else(|| anyhow!(NOT_LOGGED_IN))?;
    let client = ApiClient::new(Session::new(&settings.base_url, credential.access_token())?)?;
    match client.check_auth().await {
        Ok(status) => {
            tracing::debug!(identity = ?status.identity(), "credential accepted");
            Ok(client)
        },
        Err(e) if e.is_unauthorized() => refresh_session(settings, &client, &credential).await,
        Err(e) => Err(e).context("checking credential"),
    }
}

/// Trades the token file's refresh token for a new pair. A token taken from
/// the environment is not refreshed: the file may belong to another login.
async fn refresh_session(
    settings: &Settings,
    client: &ApiClient,
    credential: &Credential,
) -> Result<ApiClient> {
    let Credential::Stored(stored) = credential else {
        tracing::debug!("environment token rejected, not refreshing");
        bail!(SESSION_EXPIRED);
    };
    let Some(refresh) = stored.refresh_token.as_deref() else {
        bail!(SESSION_EXPIRED);
    };
    let store = settings.token_store();
    let pair = match client.refresh_token(refresh).await {
        Ok(pair) => pair,
        Err(e) if e.is_unauthorized() => bail!(SESSION_EXPIRED),
        Err(e) => return Err(e).context("refreshing credential"),
    };
    let session = Session::new(&settings.base_url, pair.access_token.clone())?;
    store.save(&StoredToken::from(pair))?;
    tracing::info!("access token refreshed");
    Ok(client.with_session(session))
}

pub(crate) fn session_expired() -> anyhow::Error {
    anyhow!(SESSION_EXPIRED)
}

fn read_password() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line).context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

pub(crate) async fn login(
    settings: &Settings,
    out: &TableRenderer,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let client = settings.anonymous_client()?;
    let pair = match client.login(username, &password).await {
        Ok(pair) => pair,
        Err(e) if e.is_unauthorized() => bail!("invalid username or password"),
        Err(e) => return Err(e).context("logging in"),
    };
    let store = settings.token_store();
    store.save(&StoredToken::from(pair))?;
    out.write_line(&format!("Logged in as {}.", username.trim()))?;
    Ok(())
}

pub(crate) fn logout(settings: &Settings, out: &TableRenderer) -> Result<()> {
    if settings.token_store().clear()? {
        out.write_line("Logged out.")?;
    } else {
        out.write_line("Not logged in.")?;
    }
    Ok(())
}

pub(crate) async fn whoami(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    let status = client.check_auth().await?;
    let account = client.account_info().await?;
    let identity = status.identity();
    let mut table = Table::new(["Field", "Value"]);
    for (field, value) in [
        ("Logged in as", identity.as_deref()),
        ("Name", account.username.as_deref()),
        ("Company", account.company_name.as_deref()),
    ] {
        table.push_row(vec![field.to_owned(), chatdash_render::format::or_missing(value)]);
    }
    out.write_records(&account, || table)?;
    Ok(())
}
