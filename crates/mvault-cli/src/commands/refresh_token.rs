//! Refresh token command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, timeout: Duration) -> Result<()> {
    let session = CliSession::open(timeout)?;

    output::note("Refreshing session...");

    let outcome = session
        .gateway()
        .refresh()
        .await
        .context("Failed to refresh session");
    session.finish(outcome)?;

    output::success("Session refreshed successfully");
    output::field("URL", session.session().base_url().as_str());

    Ok(())
}
