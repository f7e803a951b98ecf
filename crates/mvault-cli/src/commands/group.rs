//! Group commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use mvault_core::Group;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupSubcommand {
    /// List all groups
    List {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show one group
    Get { name: String },

    /// Create a group
    Create {
        name: String,

        /// Label as language=text, repeatable
        #[arg(long = "label", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },

    /// Delete a group
    Delete { name: String },
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    Ok((key.to_string(), value.to_string()))
}

pub async fn handle(cmd: GroupCommand, timeout: Duration) -> Result<()> {
    let session = CliSession::open(timeout)?;
    let outcome = run(&session, cmd.command).await;
    session.finish(outcome)
}

async fn run(session: &CliSession, command: GroupSubcommand) -> Result<()> {
    let groups = session.gateway().groups();

    match command {
        GroupSubcommand::List { pretty } => {
            let list = groups.list().await.context("Failed to list groups")?;
            output::json_lines(&list, pretty, "No groups found.")
        }
        GroupSubcommand::Get { name } => {
            let group = groups.get(&name).await.context("Failed to get group")?;
            output::json_pretty(&group)
        }
        GroupSubcommand::Create { name, labels } => {
            let group = labels
                .into_iter()
                .fold(Group::new(&name), |group, (key, value)| {
                    group.with_label(key, value)
                });
            groups.create(&group).await.context("Failed to create group")?;
            output::success(&format!("Group '{name}' created"));
            Ok(())
        }
        GroupSubcommand::Delete { name } => {
            groups.delete(&name).await.context("Failed to delete group")?;
            output::success(&format!("Group '{name}' deleted"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels() {
        assert_eq!(
            parse_label("de=Gruppe 1").unwrap(),
            ("de".to_string(), "Gruppe 1".to_string())
        );
        assert_eq!(
            parse_label("en=a=b").unwrap(),
            ("en".to_string(), "a=b".to_string())
        );
        assert!(parse_label("missing").is_err());
    }
}
