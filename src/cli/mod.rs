use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod analytics;
pub mod create;
pub mod list;
pub mod mcp;
pub mod schedule;

use crate::buttondown::{ButtondownClient, EmailStatus};
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Create a draft from a markdown file
    Create {
        /// Markdown file to create the draft from
        file: PathBuf,

        /// Title for the draft (overrides front matter)
        #[arg(long)]
        title: Option<String>,

        /// Actually create the draft instead of previewing it
        #[arg(long, action, default_value = "false")]
        confirm: bool,
    },
    /// Schedule a draft to be sent
    Schedule {
        draft_id: String,

        /// RFC 3339 timestamp or relative time like +30m, +2h, +1d, +1w
        time: String,

        #[arg(long, action, default_value = "false")]
        confirm: bool,
    },
    /// Move a scheduled email back to draft
    Unschedule {
        draft_id: String,

        #[arg(long, action, default_value = "false")]
        confirm: bool,
    },
    /// Show analytics for an email
    Analytics {
        email_id: String,

        /// Print raw JSON
        #[arg(long, action, default_value = "false")]
        json: bool,
    },
    /// List emails
    List {
        #[arg(long)]
        status: Option<EmailStatus>,

        #[arg(long, action, default_value = "false")]
        json: bool,
    },
    /// Run the MCP tool server on stdio
    Mcp {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Buttondown API key (defaults to BUTTONDOWN_API_KEY, then 1Password)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Build a client from the configured credential sources.
pub async fn client(config: &AppConfig, api_key: Option<&str>) -> Result<ButtondownClient> {
    let key = config.credential_resolver().resolve(api_key).await?;
    Ok(ButtondownClient::with_base_url(key, &config.api_base_url))
}

pub async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays clean for output and the MCP
    // protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = AppConfig::default();
    let api_key = args.api_key.as_deref();

    // Handle each sub command
    match args.command {
        Some(Command::Create {
            file,
            title,
            confirm,
        }) => {
            create::run(&config, api_key, &file, title, confirm).await?;
        }
        Some(Command::Schedule {
            draft_id,
            time,
            confirm,
        }) => {
            schedule::run(&config, api_key, &draft_id, &time, confirm).await?;
        }
        Some(Command::Unschedule { draft_id, confirm }) => {
            schedule::run_unschedule(&config, api_key, &draft_id, confirm).await?;
        }
        Some(Command::Analytics { email_id, json }) => {
            analytics::run(&config, api_key, &email_id, json).await?;
        }
        Some(Command::List { status, json }) => {
            list::run(&config, api_key, status, json).await?;
        }
        Some(Command::Mcp {}) => {
            mcp::run(&config, api_key).await?;
        }
        None => {}
    }

    Ok(())
}
