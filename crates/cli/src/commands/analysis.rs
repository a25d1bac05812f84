use anyhow::{Context, Result, bail};
use chatdash_core::CreateAnalysisRequest;
use chatdash_render::{OutputFormat, TableRenderer, analysis_details_table};

use crate::commands::auth::authorized_client;
use crate::commands::lists::MessageFilterArgs;
use crate::config::Settings;

pub(crate) async fn show(settings: &Settings, out: &TableRenderer, analysis_id: &str) -> Result<()> {
    let client = authorized_client(settings).await?;
    let details = client
        .analysis(analysis_id)
        .await
        .with_context(|| format!("loading analysis {analysis_id}"))?;
    if out.format() == OutputFormat::Json {
        out.write_json(&details)?;
        return Ok(());
    }
    out.write_table(&analysis_details_table(&details))?;
    if let Some(text) = details.result_text.as_deref().filter(|t| !t.trim().is_empty()) {
        out.write_line("")?;
        out.write_line(text)?;
    }
    Ok(())
}

/// Collects every message matching the filter and runs a prompt over them.
pub(crate) async fn analyze(
    settings: &Settings,
    out: &TableRenderer,
    prompt: Option<String>,
    filter: &MessageFilterArgs,
) -> Result<()> {
    let filter = filter.to_filter()?;
    let client = authorized_client(settings).await?;

    let prompt_id = match prompt.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => client
            .automatic_prompt()
            .await
            .context("looking up the default prompt")?
            .context("no prompt given and the account has no default prompt; pass --prompt")?,
    };

    let messages = client.messages_for_analysis(&filter).await.context("collecting messages")?;
    if messages.is_empty() {
        bail!("no messages match the filter; nothing to analyze");
    }
    let count = messages.len();
    let request = CreateAnalysisRequest { prompt_id, filters: filter, messages };
    let created = client.create_analysis(&request).await.context("creating analysis")?;
    if !created.has_result() {
        bail!("the analysis produced no result");
    }

    let id = created.analysis_id.as_deref().unwrap_or_default();
    out.write_line(&format!("Analysis {id} created from {count} messages."))?;
    if let Some(text) = created.result_text.as_deref() {
        out.write_line(text)?;
    }
    Ok(())
}

pub(crate) async fn download(settings: &Settings, out: &TableRenderer, s3_key: &str) -> Result<()> {
    let client = authorized_client(settings).await?;
    let url = client.download_url(s3_key).await.with_context(|| format!("resolving {s3_key}"))?;
    out.write_line(&url)?;
    Ok(())
}
