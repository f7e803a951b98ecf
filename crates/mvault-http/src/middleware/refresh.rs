//! One-shot token refresh on 401.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use mvault_core::{Error, Result, Session};

use super::{Middleware, Next};
use crate::auth::{bearer, refresh_tokens};
use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;

/// Recovers from an expired access token.
///
/// When the inner stages answer 401 the session is marked logged out, the
/// refresh token is exchanged for a new pair via `GET {base}login/refresh`,
/// and the original request is replayed exactly once with the new access
/// token. If the refresh itself fails, the caller gets
/// [`Error::RefreshFailed`] and the session stays logged out. A replay that
/// is rejected again is returned as is, without another refresh.
///
/// Refreshes are serialized. A request whose 401 arrives after a concurrent
/// request already renewed the tokens replays with those instead of
/// refreshing again.
///
/// Requests flagged `omit_error_reporting` pass through untouched.
pub struct TokenRefresher {
    session: Arc<Session>,
    refresh_lock: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Renew the tokens unless they changed since `dispatched_generation`.
    async fn renew(&self, transport: &dyn Transport, dispatched_generation: u64) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        if self.session.generation() != dispatched_generation {
            debug!("tokens already renewed by a concurrent request");
            return Ok(());
        }

        self.session.set_logged_out();
        info!("access token rejected, refreshing");

        refresh_tokens(&self.session, transport)
            .await
            .map_err(|err| {
                warn!(error = %err, "token refresh failed");
                Error::RefreshFailed(Box::new(err))
            })
    }
}

#[async_trait]
impl Middleware for TokenRefresher {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
        if request.options().omit_error_reporting {
            return next.run(request).await;
        }

        let generation = self.session.generation();
        let mut replay = request.clone();

        match next.run(request).await {
            Err(err) if err.is_auth_expired() => {
                replay.headers_mut().remove(AUTHORIZATION);
                self.renew(next.transport(), generation).await?;

                let token = self.session.access_token();
                replay
                    .headers_mut()
                    .insert(AUTHORIZATION, bearer(token.as_str())?);

                debug!("replaying request with renewed token");
                let result = next.run(replay).await;
                if result.as_ref().is_err_and(Error::is_auth_expired) {
                    self.session.set_logged_out();
                }
                result
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthHeaders;
    use crate::middleware::testing::ScriptedTransport;
    use crate::request::RequestOptions;
    use mvault_core::BaseUrl;
    use reqwest::Method;

    const TOKENS: &str = r#"{"access_token":"acc2","refresh_token":"ref2"}"#;

    fn session() -> Arc<Session> {
        let session = Session::new(BaseUrl::new("https://vault.example.com/api/v1/").unwrap());
        session.after_login("acc1", "ref1").unwrap();
        Arc::new(session)
    }

    fn stages(session: &Arc<Session>) -> Vec<Arc<dyn Middleware>> {
        vec![
            Arc::new(TokenRefresher::new(session.clone())),
            Arc::new(AuthHeaders::new(session.clone())),
        ]
    }

    fn get_groups() -> Request {
        Request::new(Method::GET, "https://vault.example.com/api/v1/admin/groups")
    }

    #[tokio::test]
    async fn refreshes_and_replays_once() {
        let session = session();
        let transport = ScriptedTransport::default()
            .reply(401, "")
            .reply(200, TOKENS)
            .reply(200, "[]");

        let response = Next::new(&transport, &stages(&session))
            .run(get_groups())
            .await
            .unwrap();

        assert_eq!(response.bytes(), b"[]");
        let seen = transport.seen();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].headers()[AUTHORIZATION], "Bearer acc1");
        assert_eq!(seen[1].url(), "https://vault.example.com/api/v1/login/refresh");
        assert_eq!(seen[1].headers()[AUTHORIZATION], "Bearer ref1");
        assert_eq!(seen[2].url(), "https://vault.example.com/api/v1/admin/groups");
        assert_eq!(seen[2].headers()[AUTHORIZATION], "Bearer acc2");
        assert!(session.is_logged_in());
        assert_eq!(session.refresh_token().as_str(), "ref2");
    }

    #[tokio::test]
    async fn explicit_authorization_is_replaced_on_replay() {
        let session = session();
        let transport = ScriptedTransport::default()
            .reply(401, "")
            .reply(200, TOKENS)
            .reply(200, "{}");
        let request = get_groups()
            .with_header("Authorization", "Bearer stale")
            .unwrap();

        Next::new(&transport, &stages(&session))
            .run(request)
            .await
            .unwrap();

        let seen = transport.seen();
        assert_eq!(seen[0].headers()[AUTHORIZATION], "Bearer stale");
        assert_eq!(seen[2].headers()[AUTHORIZATION], "Bearer acc2");
    }

    #[tokio::test]
    async fn refresh_failure_is_terminal() {
        let session = session();
        let transport = ScriptedTransport::default()
            .reply(401, "")
            .reply(403, r#"{"key":"invalid-refresh-token"}"#);

        let err = Next::new(&transport, &stages(&session))
            .run(get_groups())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RefreshFailed(_)));
        assert_eq!(err.report_message(), "403 invalid-refresh-token");
        assert_eq!(transport.seen().len(), 2);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn second_401_is_not_refreshed_again() {
        let session = session();
        let transport = ScriptedTransport::default()
            .reply(401, "")
            .reply(200, TOKENS)
            .reply(401, "");

        let err = Next::new(&transport, &stages(&session))
            .run(get_groups())
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
        assert_eq!(transport.seen().len(), 3);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn other_failures_pass_through() {
        let session = session();
        let transport = ScriptedTransport::default().reply(500, "");

        let err = Next::new(&transport, &stages(&session))
            .run(get_groups())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.seen().len(), 1);
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn silent_requests_are_not_refreshed() {
        let session = session();
        let transport = ScriptedTransport::default().reply(401, "");

        let err = Next::new(&transport, &stages(&session))
            .run(get_groups().with_options(RequestOptions::silent()))
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
        assert_eq!(transport.seen().len(), 1);
    }

    #[tokio::test]
    async fn skips_refresh_when_tokens_changed_meanwhile() {
        let session = session();
        let refresher = TokenRefresher::new(session.clone());
        let transport = ScriptedTransport::default();

        let dispatched = session.generation();
        session.after_login("acc-new", "ref-new").unwrap();
        refresher.renew(&transport, dispatched).await.unwrap();

        assert!(transport.seen().is_empty());
        assert!(session.is_logged_in());
    }
}
