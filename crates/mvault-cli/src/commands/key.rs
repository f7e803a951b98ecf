//! Group key commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct KeyCommand {
    #[command(subcommand)]
    pub command: KeySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum KeySubcommand {
    /// List group keys
    List {
        /// Only keys of this group
        #[arg(long)]
        group: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show one key
    Get { id: String },

    /// Generate a new key for a group
    Create { group: String },
}

pub async fn handle(cmd: KeyCommand, timeout: Duration) -> Result<()> {
    let session = CliSession::open(timeout)?;
    let outcome = run(&session, cmd.command).await;
    session.finish(outcome)
}

async fn run(session: &CliSession, command: KeySubcommand) -> Result<()> {
    let keys = session.gateway().group_keys();

    match command {
        KeySubcommand::List { group, pretty } => {
            let list = match group {
                Some(group) => keys.for_group(&group).await,
                None => keys.list().await,
            }
            .context("Failed to list keys")?;
            output::json_lines(&list, pretty, "No keys found.")
        }
        KeySubcommand::Get { id } => {
            let key = keys.get(&id).await.context("Failed to get key")?;
            output::json_pretty(&key)
        }
        KeySubcommand::Create { group } => {
            let key = keys.create(&group).await.context("Failed to create key")?;
            output::success(&format!("Key created for group '{group}'"));
            output::field("Kid", &key.id);
            output::field("Algorithm", &key.alg);
            Ok(())
        }
    }
}
