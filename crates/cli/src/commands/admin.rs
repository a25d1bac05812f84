use anyhow::{Context, Result, bail};
use chatdash_core::{ChatSchedule, HourOfDay};
use chatdash_render::{TableRenderer, list_table};

use crate::commands::auth::authorized_client;
use crate::config::Settings;

pub(crate) async fn chats(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    let chats = client.chats().await.context("loading chats")?;
    out.write_records(&chats, || list_table(&chats))?;
    Ok(())
}

pub(crate) async fn refresh_chats(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    client.refresh_chats().await.context("refreshing chats")?;
    out.write_line("Chat list refreshed.")?;
    chats(settings, out).await
}

pub(crate) async fn users(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    let users = client.users().await.context("loading users")?;
    out.write_records(&users, || list_table(&users))?;
    Ok(())
}

pub(crate) async fn refresh_users(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    client.refresh_users().await.context("refreshing users")?;
    out.write_line("User list refreshed.")?;
    users(settings, out).await
}

pub(crate) async fn prompts(settings: &Settings, out: &TableRenderer) -> Result<()> {
    let client = authorized_client(settings).await?;
    let prompts = client.prompts().await.context("loading prompts")?;
    out.write_records(&prompts, || list_table(&prompts))?;
    Ok(())
}

pub(crate) struct ScheduleArgs {
    pub chat_id: String,
    pub prompt: Option<String>,
    pub enabled: bool,
    pub analysis_hour: u32,
    pub send_hour: u32,
}

pub(crate) async fn chat_schedule(
    settings: &Settings,
    out: &TableRenderer,
    args: ScheduleArgs,
) -> Result<()> {
    let analysis_hour = HourOfDay::new(args.analysis_hour).context("--analysis-hour")?;
    let send_hour = HourOfDay::new(args.send_hour).context("--send-hour")?;
    let prompt = args.prompt.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty());
    let schedule = ChatSchedule::new(prompt, args.enabled, analysis_hour, send_hour);

    let client = authorized_client(settings).await?;
    client
        .save_chat_schedule(&args.chat_id, &schedule)
        .await
        .with_context(|| format!("saving schedule for chat {}", args.chat_id))?;
    let state = if args.enabled { "enabled" } else { "disabled" };
    out.write_line(&format!(
        "Schedule for chat {} saved: {state}, analysis at {}, sent at {}.",
        args.chat_id,
        analysis_hour.as_time(),
        send_hour.as_time()
    ))?;
    Ok(())
}

pub(crate) async fn chat_prompt(
    settings: &Settings,
    out: &TableRenderer,
    chat_id: &str,
    prompt_id: &str,
) -> Result<()> {
    let client = authorized_client(settings).await?;
    client
        .update_chat_prompt(chat_id, prompt_id)
        .await
        .with_context(|| format!("updating prompt for chat {chat_id}"))?;
    out.write_line(&format!("Chat {chat_id} now uses prompt {prompt_id}."))?;
    Ok(())
}

pub(crate) async fn rename_user(
    settings: &Settings,
    out: &TableRenderer,
    user_id: &str,
    username: &str,
) -> Result<()> {
    if username.trim().is_empty() {
        bail!("new name must not be empty");
    }
    let client = authorized_client(settings).await?;
    client
        .rename_user(user_id, username)
        .await
        .with_context(|| format!("renaming user {user_id}"))?;
    out.write_line(&format!("User {user_id} renamed to {}.", username.trim()))?;
    Ok(())
}
