use std::process::ExitCode;

use anyhow::Result;
use chatdash_core::DEFAULT_BASE_URL;
use chatdash_render::{OutputFormat, TableRenderer};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod token_store;

use commands::admin::ScheduleArgs;
use commands::browse::ListKind;
use commands::lists::{LogFilterArgs, MessageFilterArgs};
use config::Settings;

/// Marks a failure that has already been shown to the user.
#[derive(Debug)]
pub(crate) struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("request failed")
    }
}

impl std::error::Error for Reported {}

#[derive(Parser)]
#[command(name = "chatdash")]
#[command(version, about = "Admin console for the chat analysis service", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "CHATDASH_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Rows per page (1-100); defaults to CHATDASH_PAGE_SIZE or 10
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Write tables as HTML fragments
    #[arg(long, global = true, conflicts_with = "json")]
    html: bool,

    /// Write raw records as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the access token
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show who the stored token belongs to
    Whoami,
    /// Application logs
    Logs {
        #[command(flatten)]
        filter: LogFilterArgs,
        #[arg(long, default_value = "1")]
        page: u64,
        /// Reload every SECS seconds until Ctrl-C
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Stored analyses
    Analyses {
        #[arg(long, default_value = "1")]
        page: u64,
    },
    /// One analysis with its token cost
    Analysis { id: String },
    /// Collected chat messages
    Messages {
        #[command(flatten)]
        filter: MessageFilterArgs,
        #[arg(long, default_value = "1")]
        page: u64,
    },
    /// Page through a listing interactively
    Browse {
        #[arg(value_enum)]
        list: ListKind,
        #[command(flatten)]
        logs: LogFilterArgs,
        #[command(flatten)]
        messages: MessageFilterArgs,
    },
    /// Chats the bot is in
    Chats {
        #[command(subcommand)]
        action: Option<RefreshAction>,
    },
    /// Users known to the bot
    Users {
        #[command(subcommand)]
        action: Option<RefreshAction>,
    },
    /// Analysis prompts
    Prompts,
    /// Configure scheduled analysis for a chat
    ChatSchedule {
        #[arg(allow_hyphen_values = true)]
        chat_id: String,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        #[arg(long, value_name = "HOUR")]
        analysis_hour: u32,
        #[arg(long, value_name = "HOUR")]
        send_hour: u32,
    },
    /// Set a chat's default prompt
    ChatPrompt {
        #[arg(allow_hyphen_values = true)]
        chat_id: String,
        prompt_id: String,
    },
    /// Change a user's display name
    RenameUser { user_id: String, username: String },
    /// Run a prompt over every message matching the filter
    Analyze {
        /// Defaults to the account's automatic prompt
        #[arg(long)]
        prompt: Option<String>,
        #[command(flatten)]
        filter: MessageFilterArgs,
    },
    /// Print a download link for a message attachment
    Download { s3_key: String },
}

#[derive(Subcommand)]
enum RefreshAction {
    /// Re-sync from Telegram, then list
    Refresh,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<()> {
    let format = if cli.html {
        OutputFormat::Html
    } else if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let settings = Settings::resolve(cli.url, cli.page_size, format)?;
    let out = TableRenderer::stdio(format);

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&settings, &out, &username, password).await?;
        },
        Commands::Logout => commands::auth::logout(&settings, &out)?,
        Commands::Whoami => commands::auth::whoami(&settings, &out).await?,
        Commands::Logs { filter, page, watch } => {
            commands::lists::logs(&settings, &filter, page, watch).await?;
        },
        Commands::Analyses { page } => commands::lists::analyses(&settings, page).await?,
        Commands::Analysis { id } => commands::analysis::show(&settings, &out, &id).await?,
        Commands::Messages { filter, page } => {
            commands::lists::messages(&settings, &filter, page).await?;
        },
        Commands::Browse { list, logs, messages } => {
            commands::browse::browse(&settings, list, &logs, &messages).await?;
        },
        Commands::Chats { action: None } => commands::admin::chats(&settings, &out).await?,
        Commands::Chats { action: Some(RefreshAction::Refresh) } => {
            commands::admin::refresh_chats(&settings, &out).await?;
        },
        Commands::Users { action: None } => commands::admin::users(&settings, &out).await?,
        Commands::Users { action: Some(RefreshAction::Refresh) } => {
            commands::admin::refresh_users(&settings, &out).await?;
        },
        Commands::Prompts => commands::admin::prompts(&settings, &out).await?,
        Commands::ChatSchedule { chat_id, prompt, enable, disable, analysis_hour, send_hour } => {
            let args = ScheduleArgs {
                chat_id,
                prompt,
                enabled: enable && !disable,
                analysis_hour,
                send_hour,
            };
            commands::admin::chat_schedule(&settings, &out, args).await?;
        },
        Commands::ChatPrompt { chat_id, prompt_id } => {
            commands::admin::chat_prompt(&settings, &out, &chat_id, &prompt_id).await?;
        },
        Commands::RenameUser { user_id, username } => {
            commands::admin::rename_user(&settings, &out, &user_id, &username).await?;
        },
        Commands::Analyze { prompt, filter } => {
            commands::analysis::analyze(&settings, &out, prompt, &filter).await?;
        },
        Commands::Download { s3_key } => commands::analysis::download(&settings, &out, &s3_key).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<Reported>().is_some() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
