//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(_args: WhoamiArgs) -> Result<()> {
    let stored = storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'mvault login' first.")?;
    let session = stored.restore()?;

    output::field("URL", session.base_url().as_str());
    output::field("Logged in since", &stored.logged_in_at.to_rfc3339());
    output::field(
        "Status",
        if session.is_logged_in() {
            "logged in"
        } else {
            "logged out"
        },
    );

    Ok(())
}
