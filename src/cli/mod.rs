pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::AdminClient;

#[derive(Parser)]
#[command(name = "guestbook")]
#[command(about = "Guestbook CLI - moderate entries through the admin API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "GUESTBOOK_SERVER",
        default_value = "http://localhost:3000",
        help = "Base URL of the guestbook server"
    )]
    pub server: String,

    #[arg(
        long,
        global = true,
        env = "GUESTBOOK_ADMIN_SECRET",
        hide_env_values = true,
        help = "Shared admin secret"
    )]
    pub secret: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List every entry, including hidden ones")]
    List {
        #[arg(long, help = "Only entries waiting for approval")]
        pending: bool,
        #[arg(long, help = "Only soft-deleted entries")]
        deleted: bool,
    },

    #[command(about = "Approve an entry held for moderation")]
    Approve {
        #[arg(help = "Entry key")]
        key: String,
    },

    #[command(about = "Restore a soft-deleted entry")]
    Undelete {
        #[arg(help = "Entry key")]
        key: String,
    },

    #[command(about = "Delete an entry (soft by default)")]
    Delete {
        #[arg(help = "Entry key")]
        key: String,
        #[arg(long, help = "Remove the record permanently")]
        hard: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let secret = cli
        .secret
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("admin secret required; pass --secret or set GUESTBOOK_ADMIN_SECRET"))?;
    let client = AdminClient::new(cli.server, secret);

    commands::entries::handle(cli.command, &client, output_format).await
}
