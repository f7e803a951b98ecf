//! Session storage for persisting login state between invocations.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use mvault_core::{AccessToken, BaseUrl, RefreshToken, Session};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const SESSION_FILE: &str = "session.json";

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub base_url: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub logged_in_at: DateTime<Utc>,
}

impl StoredSession {
    /// Snapshot the tokens currently held by `session`.
    pub fn capture(session: &Session, logged_in_at: DateTime<Utc>) -> Self {
        Self {
            base_url: session.base_url().to_string(),
            access_token: session.access_token().as_str().to_string(),
            refresh_token: session.refresh_token().as_str().to_string(),
            logged_in_at,
        }
    }

    /// Rebuild the in-memory session.
    pub fn restore(&self) -> Result<Session> {
        let base_url = BaseUrl::new(&self.base_url).context("Invalid service URL in session")?;
        Ok(Session::from_persisted(
            base_url,
            AccessToken::new(&self.access_token),
            RefreshToken::new(&self.refresh_token),
        ))
    }
}

/// Get the session file path, creating its directory.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "mvault").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join(SESSION_FILE))
}

/// Save a session to disk, readable by the owner only.
pub fn save_session(stored: &StoredSession) -> Result<()> {
    let path = session_path()?;
    let json = serde_json::to_string_pretty(stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Load the stored session, if there is one.
pub fn load_session() -> Result<Option<StoredSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored = serde_json::from_str(&json).context("Invalid session file")?;
    Ok(Some(stored))
}

/// Remove the stored session. Returns whether there was one.
pub fn clear_session() -> Result<bool> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove session file")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_keeps_tokens() {
        let stored = StoredSession {
            base_url: "https://vault.example.com/api/v1".to_string(),
            access_token: "acc1".to_string(),
            refresh_token: "ref1".to_string(),
            logged_in_at: Utc::now(),
        };

        let session = stored.restore().unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.base_url().as_str(), "https://vault.example.com/api/v1/");
        assert_eq!(session.refresh_token().as_str(), "ref1");
    }

    #[test]
    fn capture_round_trips_through_json() {
        let session = StoredSession {
            base_url: "http://localhost:8443/api/v1/".to_string(),
            access_token: "acc1".to_string(),
            refresh_token: String::new(),
            logged_in_at: Utc::now(),
        }
        .restore()
        .unwrap();

        let json = serde_json::to_string(&StoredSession::capture(&session, Utc::now())).unwrap();
        let back: StoredSession = serde_json::from_str(&json).unwrap();

        assert_eq!(back.access_token, "acc1");
        assert!(back.refresh_token.is_empty());
    }

    #[test]
    fn missing_refresh_token_defaults_to_empty() {
        let stored: StoredSession = serde_json::from_str(
            r#"{"base_url":"https://vault.example.com/","access_token":"a","logged_in_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(stored.refresh_token.is_empty());
    }
}
