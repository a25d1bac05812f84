use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use chatdash_client::{AnalysesSource, ClientError, LogsSource, MessagesSource};
use chatdash_core::{Filter, ListSource, Page, parse_date};
use chatdash_pager::{AutoRefresh, LoadError, PageRenderer, PaginatedFilteredListController};
use chatdash_render::{TableRenderer, TableRow};
use clap::Args;
use serde::Serialize;

use crate::Reported;
use crate::commands::auth::{authorized_client, session_expired};
use crate::config::Settings;

#[derive(Debug, Clone, Args)]
pub(crate) struct LogFilterArgs {
    /// Only logs from this day (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long)]
    pub date: Option<String>,
}

impl LogFilterArgs {
    pub(crate) fn to_filter(&self) -> Result<Filter> {
        let date = self.date.as_deref().map(parse_date).transpose()?;
        Ok(Filter::new().with_date("date", date))
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct MessageFilterArgs {
    /// First day, inclusive (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long)]
    pub from: Option<String>,
    /// Last day, inclusive
    #[arg(long)]
    pub to: Option<String>,
    /// Only messages from this user
    #[arg(long = "user")]
    pub user_id: Option<String>,
    /// Only messages from this chat (group chat ids are negative)
    #[arg(long = "chat", allow_hyphen_values = true)]
    pub chat_id: Option<String>,
}

impl MessageFilterArgs {
    pub(crate) fn to_filter(&self) -> Result<Filter> {
        let from = self.from.as_deref().map(parse_date).transpose()?;
        let to = self.to.as_deref().map(parse_date).transpose()?;
        Ok(Filter::new()
            .with_date_range(from, to)?
            .with_opt("user_id", self.user_id.as_deref())
            .with_opt("chat_id", self.chat_id.as_deref()))
    }
}

/// Forwards only the page the user asked for, so reaching page N from a
/// cold start prints one table instead of two.
struct TargetPage<R> {
    inner: R,
    target: u64,
}

impl<T, R: PageRenderer<T>> PageRenderer<T> for TargetPage<R> {
    fn render(&self, page: &Page<T>) {
        if page.current_page() == self.target || page.total_pages() < self.target {
            self.inner.render(page);
        }
    }

    fn show_error(&self, error: &(dyn std::error::Error + 'static)) {
        self.inner.show_error(error);
    }
}

/// Turns a load outcome into the CLI's error policy: stale loads are
/// ignored, rejected credentials end the session, other failures were
/// already shown by the renderer.
pub(crate) fn check_load<T>(outcome: Result<T, LoadError<ClientError>>) -> Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(LoadError::Source(e)) if e.is_unauthorized() => Err(session_expired()),
        Err(LoadError::Source(_)) => Err(Reported.into()),
        Err(stale) => {
            tracing::debug!(error = %stale, "load discarded");
            Ok(None)
        },
    }
}

async fn show_page<S>(
    settings: &Settings,
    source: S,
    filter: Filter,
    page: u64,
    watch: Option<u64>,
) -> Result<()>
where
    S: ListSource<Error = ClientError> + 'static,
    S::Item: TableRow + Serialize,
{
    if page == 0 {
        bail!("--page starts at 1");
    }
    let out = Arc::new(TableRenderer::stdio(settings.format));
    let renderer = TargetPage { inner: Arc::clone(&out), target: page };
    let ctl = Arc::new(PaginatedFilteredListController::new(source, renderer, settings.page_size));
    ctl.set_filters(filter);

    check_load(ctl.load().await)?;
    if page > 1 {
        let total_pages = ctl.state().total_pages;
        if page > total_pages {
            out.write_error(&format!("page {page} is out of range (1-{}); showing page 1", total_pages.max(1)))?;
        } else {
            check_load(ctl.go_to_page(page).await)?;
        }
    }

    if let Some(secs) = watch.filter(|s| *s > 0) {
        let refresh = AutoRefresh::spawn(Arc::clone(&ctl), Duration::from_secs(secs));
        tracing::info!(secs, "watching for changes, press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        refresh.stop();
    }
    Ok(())
}

pub(crate) async fn logs(
    settings: &Settings,
    filter: &LogFilterArgs,
    page: u64,
    watch: Option<u64>,
) -> Result<()> {
    let filter = filter.to_filter()?;
    let client = authorized_client(settings).await?;
    show_page(settings, LogsSource::new(client), filter, page, watch).await
}

pub(crate) async fn analyses(settings: &Settings, page: u64) -> Result<()> {
    let client = authorized_client(settings).await?;
    show_page(settings, AnalysesSource::new(client), Filter::new(), page, None).await
}

pub(crate) async fn messages(settings: &Settings, filter: &MessageFilterArgs, page: u64) -> Result<()> {
    let filter = filter.to_filter()?;
    let client = authorized_client(settings).await?;
    show_page(settings, MessagesSource::new(client), filter, page, None).await
}
