//! Login state shared by everything that talks to one service.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::AuthError;
use crate::types::BaseUrl;
use crate::{AccessToken, RefreshToken, Result};

/// Login state and tokens for one micro-vault service.
///
/// A session is created once per process and handed to whoever needs it,
/// typically as `Arc<Session>`. It changes only through
/// [`Session::after_login`] and [`Session::set_logged_out`].
///
/// Invariant: while [`Session::is_logged_in`] is true the access token is
/// non-empty.
///
/// # Example
///
/// ```
/// use mvault_core::{BaseUrl, Session};
///
/// let session = Session::new(BaseUrl::new("https://vault.example.com/api/v1/").unwrap());
/// assert!(!session.is_logged_in());
///
/// session.after_login("acc1", "ref1").unwrap();
/// assert!(session.is_logged_in());
/// assert_eq!(session.access_token().as_str(), "acc1");
/// ```
pub struct Session {
    base_url: BaseUrl,
    state: RwLock<SessionState>,
}

#[derive(Default)]
struct SessionState {
    logged_in: bool,
    access_token: AccessToken,
    refresh_token: RefreshToken,
    generation: u64,
}

impl Session {
    /// Create an empty, logged-out session for a service.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Restore a session from persisted tokens.
    ///
    /// The session counts as logged in when the access token is non-empty.
    /// The caller is responsible for the tokens still being valid; an expired
    /// access token is renewed by the gateway on the first 401.
    pub fn from_persisted(
        base_url: BaseUrl,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> Self {
        Self {
            base_url,
            state: RwLock::new(SessionState {
                logged_in: !access_token.is_empty(),
                access_token,
                refresh_token,
                generation: 0,
            }),
        }
    }

    /// Store fresh tokens and mark the session logged in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptyToken`] and leaves the session untouched if
    /// either token is empty.
    pub fn after_login(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<()> {
        let access_token = AccessToken::new(access_token);
        let refresh_token = RefreshToken::new(refresh_token);

        if access_token.is_empty() {
            return Err(AuthError::EmptyToken { which: "access" }.into());
        }
        if refresh_token.is_empty() {
            return Err(AuthError::EmptyToken { which: "refresh" }.into());
        }

        let mut state = self.write();
        state.logged_in = true;
        state.access_token = access_token;
        state.refresh_token = refresh_token;
        state.generation += 1;
        debug!(generation = state.generation, "session tokens updated");
        Ok(())
    }

    /// Mark the session logged out. Tokens are kept for a later refresh.
    pub fn set_logged_out(&self) {
        self.write().logged_in = false;
        debug!("session marked logged out");
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().logged_in
    }

    /// Snapshot of the current access token (empty if none).
    pub fn access_token(&self) -> AccessToken {
        self.read().access_token.clone()
    }

    /// Snapshot of the current refresh token (empty if none).
    pub fn refresh_token(&self) -> RefreshToken {
        self.read().refresh_token.clone()
    }

    /// Counter bumped by every successful [`Session::after_login`].
    ///
    /// Comparing generations tells whether the tokens changed in between,
    /// e.g. because a concurrent request already refreshed them.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("logged_in", &self.is_logged_in())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn session() -> Session {
        Session::new(BaseUrl::new("https://vault.example.com/api/v1/").unwrap())
    }

    #[test]
    fn starts_logged_out_and_empty() {
        let session = session();
        assert!(!session.is_logged_in());
        assert!(session.access_token().is_empty());
        assert!(session.refresh_token().is_empty());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn after_login_sets_tokens() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.access_token().as_str(), "acc1");
        assert_eq!(session.refresh_token().as_str(), "ref1");
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn after_login_rejects_empty_tokens() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();

        let err = session.after_login("", "ref2").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::EmptyToken { which: "access" })));
        let err = session.after_login("acc2", "").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::EmptyToken { which: "refresh" })));

        assert_eq!(session.access_token().as_str(), "acc1");
        assert_eq!(session.refresh_token().as_str(), "ref1");
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn set_logged_out_keeps_tokens() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        session.set_logged_out();
        assert!(!session.is_logged_in());
        assert_eq!(session.refresh_token().as_str(), "ref1");
    }

    #[test]
    fn from_persisted_logged_in_iff_access_token() {
        let base = BaseUrl::new("https://vault.example.com").unwrap();
        let restored = Session::from_persisted(
            base.clone(),
            AccessToken::new("acc"),
            RefreshToken::new("ref"),
        );
        assert!(restored.is_logged_in());

        let empty = Session::from_persisted(base, AccessToken::default(), RefreshToken::new("ref"));
        assert!(!empty.is_logged_in());
    }

    #[test]
    fn debug_hides_tokens() {
        let session = session();
        session.after_login("secret-access", "secret-refresh").unwrap();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
