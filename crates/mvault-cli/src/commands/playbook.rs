//! Playbook upload command implementation.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct PlaybookArgs {
    /// JSON playbook file
    #[arg(long, short)]
    pub file: PathBuf,
}

pub async fn run(args: PlaybookArgs, timeout: Duration) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let playbook: serde_json::Value =
        serde_json::from_str(&content).context("Playbook is not valid JSON")?;

    let session = CliSession::open(timeout)?;
    let outcome = session
        .gateway()
        .playbook()
        .upload(&playbook)
        .await
        .context("Failed to upload playbook");
    session.finish(outcome)?;

    output::success("Playbook executed");
    Ok(())
}
