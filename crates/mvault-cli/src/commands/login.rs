//! Login command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use mvault_core::{BaseUrl, Credentials, Session};

use crate::output;
use crate::session::CliSession;

pub const DEFAULT_URL: &str = "https://localhost:8443/api/v1/";

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin user name
    #[arg(long, short)]
    pub user: String,

    /// Admin password
    #[arg(long, short)]
    pub password: String,

    /// Base URL of the service API
    #[arg(long, env = "MVAULT_URL", default_value = DEFAULT_URL)]
    pub url: String,
}

pub async fn run(args: LoginArgs, timeout: Duration) -> Result<()> {
    let base_url = BaseUrl::new(&args.url).context("Invalid service URL")?;
    let credentials = Credentials::new(&args.user, &args.password);

    output::note("Logging in...");

    let session = Arc::new(Session::new(base_url));
    let session = CliSession::with_session(session, Utc::now(), timeout)?;
    session
        .gateway()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    session.save()?;

    output::success("Logged in successfully");
    println!();
    output::field("User", credentials.user());
    output::field("URL", session.session().base_url().as_str());

    Ok(())
}
