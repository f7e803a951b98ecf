//! Client commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use mvault_core::NewClient;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ClientCommand {
    #[command(subcommand)]
    pub command: ClientSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ClientSubcommand {
    /// List clients
    List {
        /// Only clients in this group
        #[arg(long)]
        group: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show one client
    Get { name: String },

    /// Register a client and print its credentials
    Create {
        name: String,

        /// Group membership, repeatable
        #[arg(long = "group")]
        groups: Vec<String>,
    },

    /// Delete a client
    Delete { name: String },
}

pub async fn handle(cmd: ClientCommand, timeout: Duration) -> Result<()> {
    let session = CliSession::open(timeout)?;
    let outcome = run(&session, cmd.command).await;
    session.finish(outcome)
}

async fn run(session: &CliSession, command: ClientSubcommand) -> Result<()> {
    let clients = session.gateway().clients();

    match command {
        ClientSubcommand::List { group, pretty } => {
            let list = match group {
                Some(group) => clients.for_group(&group).await,
                None => clients.list().await,
            }
            .context("Failed to list clients")?;
            output::json_lines(&list, pretty, "No clients found.")
        }
        ClientSubcommand::Get { name } => {
            let client = clients.get(&name).await.context("Failed to get client")?;
            output::json_pretty(&client)
        }
        ClientSubcommand::Create { name, groups } => {
            let client = clients
                .create(&NewClient::new(name, groups))
                .await
                .context("Failed to create client")?;

            output::success("Client created");
            println!();
            output::field("Name", &client.name);
            output::field("Access key", &client.access_key);
            output::field("Secret", &client.secret);
            output::note("The secret is shown only once.");
            Ok(())
        }
        ClientSubcommand::Delete { name } => {
            clients.delete(&name).await.context("Failed to delete client")?;
            output::success(&format!("Client '{name}' deleted"));
            Ok(())
        }
    }
}
