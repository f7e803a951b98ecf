//! Subcommand implementations.

mod client;
mod group;
mod key;
mod login;
mod logout;
mod playbook;
mod refresh_token;
mod whoami;

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in as admin and store the session
    Login(login::LoginArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Renew the session tokens
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Manage groups
    Group(group::GroupCommand),

    /// Manage clients
    Client(client::ClientCommand),

    /// Manage group keys
    Key(key::KeyCommand),

    /// Upload a provisioning playbook
    Playbook(playbook::PlaybookArgs),
}

/// Run a command; `timeout` applies to every request it sends.
pub async fn handle(command: Command, timeout: Duration) -> Result<()> {
    match command {
        Command::Login(args) => login::run(args, timeout).await,
        Command::Whoami(args) => whoami::run(args),
        Command::RefreshToken(args) => refresh_token::run(args, timeout).await,
        Command::Logout(args) => logout::run(args),
        Command::Group(cmd) => group::handle(cmd, timeout).await,
        Command::Client(cmd) => client::handle(cmd, timeout).await,
        Command::Key(cmd) => key::handle(cmd, timeout).await,
        Command::Playbook(args) => playbook::run(args, timeout).await,
    }
}
