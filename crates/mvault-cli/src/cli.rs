//! CLI argument definitions.

use clap::Parser;

use crate::commands::Command;

/// Administer a micro-vault service.
#[derive(Parser, Debug)]
#[command(name = "mvault")]
#[command(author, version = env!("MVAULT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS", default_value_t = 5)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}
