use std::path::Path;
use std::process::Output;

use tokio::process::Command;

/// Run the CLI with a custom HOME directory for isolated session storage.
pub async fn run_cli_with_home(args: &[&str], home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mvault"))
        .args(args)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("MVAULT_URL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub async fn run_cli_success(args: &[&str], home: &Path) -> String {
    let output = run_cli_with_home(args, home).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Path of the stored session below `home`.
pub fn session_file(home: &Path) -> std::path::PathBuf {
    home.join("data").join("mvault").join("session.json")
}
