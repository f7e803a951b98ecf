//! Bearer token injection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use mvault_core::{Result, Session};

use super::{Middleware, Next};
use crate::auth::{default_headers, merge_headers};
use crate::request::Request;
use crate::response::Response;

/// Merges `Authorization: Bearer <access token>` and the JSON content type
/// into each request; headers already on the request win.
///
/// This is the innermost stage, so the token is read at the moment the
/// request is handed to the transport and a refresh that completed while the
/// request was queued is picked up.
pub struct AuthHeaders {
    session: Arc<Session>,
}

impl AuthHeaders {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Middleware for AuthHeaders {
    async fn handle(&self, mut request: Request, next: Next<'_>) -> Result<Response> {
        let defaults = default_headers(&self.session, request.method())?;
        let merged = merge_headers(defaults, request.headers());
        *request.headers_mut() = merged;

        trace!(headers = ?request.headers().keys().collect::<Vec<_>>(), "dispatching");
        next.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::testing::ScriptedTransport;
    use mvault_core::BaseUrl;
    use reqwest::Method;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    fn stages(session: &Arc<Session>) -> Vec<Arc<dyn Middleware>> {
        vec![Arc::new(AuthHeaders::new(session.clone()))]
    }

    fn session() -> Arc<Session> {
        Arc::new(Session::new(
            BaseUrl::new("https://vault.example.com/api/v1/").unwrap(),
        ))
    }

    #[tokio::test]
    async fn injects_current_token() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        let transport = ScriptedTransport::default();

        Next::new(&transport, &stages(&session))
            .run(Request::new(Method::GET, "https://vault.example.com/api/v1/admin/groups"))
            .await
            .unwrap();

        let seen = transport.seen();
        assert_eq!(seen[0].headers()[AUTHORIZATION], "Bearer acc1");
        assert!(seen[0].headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn omits_header_without_token() {
        let session = session();
        let transport = ScriptedTransport::default();

        Next::new(&transport, &stages(&session))
            .run(Request::new(Method::POST, "https://vault.example.com/api/v1/admin/groups"))
            .await
            .unwrap();

        let seen = transport.seen();
        assert!(seen[0].headers().get(AUTHORIZATION).is_none());
        assert_eq!(seen[0].headers()[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn explicit_header_wins() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        let transport = ScriptedTransport::default();
        let request = Request::new(Method::GET, "https://vault.example.com/api/v1/admin/groups")
            .with_header("Authorization", "Bearer explicit")
            .unwrap();

        Next::new(&transport, &stages(&session))
            .run(request)
            .await
            .unwrap();

        assert_eq!(transport.seen()[0].headers()[AUTHORIZATION], "Bearer explicit");
    }
}
