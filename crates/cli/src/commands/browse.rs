//! Interactive paging over one listing.

use std::sync::Arc;

use anyhow::Result;
use chatdash_client::{AnalysesSource, ClientError, LogsSource, MessagesSource};
use chatdash_core::{Filter, ListSource};
use chatdash_pager::PaginatedFilteredListController;
use chatdash_render::{TableRenderer, TableRow};
use clap::ValueEnum;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::auth::authorized_client;
use crate::commands::lists::{LogFilterArgs, MessageFilterArgs, check_load};
use crate::config::Settings;

const HELP: &str = "n: next page, p: previous page, g <n>: go to page, r: reload, q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListKind {
    Logs,
    Analyses,
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    GoTo(u64),
    Reload,
    Help,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let parsed = match command.as_str() {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Prev,
            "g" | "go" | "goto" => Self::GoTo(words.next()?.parse().ok()?),
            "r" | "reload" => Self::Reload,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(parsed)
    }
}

pub(crate) async fn browse(
    settings: &Settings,
    kind: ListKind,
    logs: &LogFilterArgs,
    messages: &MessageFilterArgs,
) -> Result<()> {
    let client = authorized_client(settings).await?;
    match kind {
        ListKind::Logs => run(settings, LogsSource::new(client), logs.to_filter()?).await,
        ListKind::Analyses => run(settings, AnalysesSource::new(client), Filter::new()).await,
        ListKind::Messages => run(settings, MessagesSource::new(client), messages.to_filter()?).await,
    }
}

async fn run<S>(settings: &Settings, source: S, filter: Filter) -> Result<()>
where
    S: ListSource<Error = ClientError> + 'static,
    S::Item: TableRow + Serialize,
{
    let out = Arc::new(TableRenderer::stdio(settings.format));
    let ctl = PaginatedFilteredListController::new(source, Arc::clone(&out), settings.page_size);
    ctl.set_filters(filter);
    check_load(ctl.load().await)?;
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = BrowseCommand::parse(&line) else {
            eprintln!("unknown command {:?}; {HELP}", line.trim());
            continue;
        };
        let outcome = match command {
            BrowseCommand::Next => ctl.next_page().await,
            BrowseCommand::Prev => ctl.prev_page().await,
            BrowseCommand::GoTo(n) => ctl.go_to_page(n).await,
            BrowseCommand::Reload => ctl.load().await.map(Some),
            BrowseCommand::Help => {
                eprintln!("{HELP}");
                continue;
            },
            BrowseCommand::Quit => break,
        };
        // Source failures other than an expired session were already shown.
        let moved = match check_load(outcome) {
            Ok(moved) => moved,
            Err(e) if e.downcast_ref::<crate::Reported>().is_some() => continue,
            Err(e) => return Err(e),
        };
        if matches!(moved, Some(None)) {
            let state = ctl.state();
            eprintln!("page {} of {}: no such page", state.current_page, state.total_pages.max(1));
        }
    }
    Ok(())
}
