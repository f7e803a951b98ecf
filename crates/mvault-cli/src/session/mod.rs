//! The session a command runs with.

pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use mvault_core::error::AuthError;
use mvault_core::{Error, Session};
use mvault_http::{Gateway, GatewayConfig};

use crate::notify::ConsoleSink;
use crate::output;
use storage::StoredSession;

const NOT_LOGGED_IN: &str = "No active session. Run 'mvault login' first.";

/// A gateway over the stored session.
///
/// Pass the command's outcome through [`CliSession::finish`] so that tokens
/// renewed along the way are written back.
#[derive(Debug)]
pub struct CliSession {
    gateway: Gateway,
    logged_in_at: DateTime<Utc>,
    generation: u64,
}

impl CliSession {
    /// Open the stored session.
    pub fn open(timeout: Duration) -> Result<Self> {
        let stored = storage::load_session()
            .context("Failed to load session")?
            .context(NOT_LOGGED_IN)?;
        let session = stored.restore()?;
        if !session.is_logged_in() {
            return Err(Error::from(AuthError::NotLoggedIn)).context(NOT_LOGGED_IN);
        }
        Self::with_session(Arc::new(session), stored.logged_in_at, timeout)
    }

    /// Wrap a freshly created session.
    pub fn with_session(
        session: Arc<Session>,
        logged_in_at: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<Self> {
        let generation = session.generation();
        let config = GatewayConfig::for_base_url(session.base_url()).with_timeout(timeout);
        let gateway = Gateway::builder(session)
            .config(config)
            .notifier(Arc::new(ConsoleSink))
            .build()
            .context("Failed to set up HTTP client")?;

        Ok(Self {
            gateway,
            logged_in_at,
            generation,
        })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    /// Persist the session state a command left behind, then hand back its
    /// outcome.
    ///
    /// Renewed tokens are saved. The stored session is removed only when the
    /// service rejected it; after a timeout or a 5xx during renewal the
    /// stored tokens are kept for the next attempt.
    pub fn finish<T>(&self, outcome: Result<T>) -> Result<T> {
        let session = self.session();

        if session.is_logged_in() {
            if session.generation() != self.generation {
                storage::save_session(&StoredSession::capture(session, self.logged_in_at))
                    .context("Failed to save renewed session")?;
            }
        } else if outcome
            .as_ref()
            .err()
            .and_then(gateway_error)
            .is_some_and(Error::is_session_rejected)
        {
            storage::clear_session()?;
            output::warning("Session rejected by the service. Run 'mvault login' again.");
        } else {
            debug!("session could not be renewed, keeping stored tokens");
            output::warning("Could not renew the session; try again later.");
        }

        outcome
    }

    /// Save the session unconditionally.
    pub fn save(&self) -> Result<()> {
        storage::save_session(&StoredSession::capture(self.session(), self.logged_in_at))
            .context("Failed to save session")
    }
}

/// The gateway failure underneath a command error, if any.
fn gateway_error(err: &anyhow::Error) -> Option<&Error> {
    err.chain().find_map(|cause| cause.downcast_ref::<Error>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvault_core::error::ApiError;

    #[test]
    fn finds_gateway_error_under_context() {
        let err = Err::<(), _>(Error::from(ApiError::new(401, None, None)))
            .context("Failed to list groups")
            .unwrap_err();

        let found = gateway_error(&err).unwrap();
        assert_eq!(found.status(), Some(401));
        assert!(found.is_session_rejected());
    }

    #[test]
    fn no_gateway_error_in_plain_failure() {
        let err = anyhow::anyhow!("Playbook is not valid JSON");
        assert!(gateway_error(&err).is_none());
    }
}
