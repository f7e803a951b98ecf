//! The authenticated request gateway.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use mvault_core::{Credentials, Error, NotificationSink, Result, Session, TracingSink};

use crate::auth::{self, auth_headers, merge_headers};
use crate::config::GatewayConfig;
use crate::middleware::{AuthHeaders, ErrorReporter, Middleware, Next, TokenRefresher};
use crate::request::{Request, RequestOptions};
use crate::resources::{ClientsApi, GroupKeysApi, GroupsApi, PlaybookApi};
use crate::response::Response;
use crate::transport::{HttpTransport, Transport};

/// Issues admin API calls with token injection, failure reporting and
/// transparent re-authentication.
///
/// Cheap to share behind an `Arc`; all state lives in the [`Session`].
pub struct Gateway {
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
    stages: Vec<Arc<dyn Middleware>>,
}

impl Gateway {
    /// Create a gateway with default configuration and a [`TracingSink`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(session: Arc<Session>) -> Result<Self> {
        Self::builder(session).build()
    }

    pub fn builder(session: Arc<Session>) -> GatewayBuilder {
        GatewayBuilder::new(session)
    }

    /// Returns the session this gateway authenticates with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The auth header for the current token merged with `extra`; keys in
    /// `extra` win.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be carried in a header.
    pub fn headers(&self, extra: Option<&HeaderMap>) -> Result<HeaderMap> {
        let defaults = auth_headers(&self.session)?;
        Ok(match extra {
            Some(extra) => merge_headers(defaults, extra),
            None => defaults,
        })
    }

    /// Build a request for an admin resource path, e.g. `groups/admins`.
    ///
    /// The path is used as given; the resource proxies encode item names.
    pub fn admin_request(&self, method: Method, path: &str) -> Request {
        Request::new(method, self.session.base_url().admin_url(path))
    }

    /// Issue an admin API call.
    ///
    /// # Errors
    ///
    /// Returns the failure after it was reported (unless
    /// `options.omit_error_reporting`); an expired token is renewed
    /// transparently and only surfaces as [`Error::RefreshFailed`].
    #[instrument(skip(self, body))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<Response> {
        let request = self
            .admin_request(method, path)
            .with_body(body)
            .with_options(options);
        self.send(request).await
    }

    /// Run a prepared request through the pipeline.
    pub async fn send(&self, request: Request) -> Result<Response> {
        Next::new(self.transport.as_ref(), &self.stages)
            .run(request)
            .await
    }

    /// Log in as admin and store the issued tokens in the session.
    ///
    /// Talks to the transport directly; a failed login is returned, not
    /// reported.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!(user = credentials.user(), "logging in");
        auth::login(&self.session, self.transport.as_ref(), credentials).await
    }

    /// Exchange the refresh token for a new token pair right away.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefreshFailed`] and marks the session logged out if
    /// the service rejects the refresh token.
    pub async fn refresh(&self) -> Result<()> {
        auth::refresh_tokens(&self.session, self.transport.as_ref())
            .await
            .map_err(|err| {
                self.session.set_logged_out();
                Error::RefreshFailed(Box::new(err))
            })
    }

    pub fn clients(&self) -> ClientsApi<'_> {
        ClientsApi::new(self)
    }

    pub fn groups(&self) -> GroupsApi<'_> {
        GroupsApi::new(self)
    }

    pub fn group_keys(&self) -> GroupKeysApi<'_> {
        GroupKeysApi::new(self)
    }

    pub fn playbook(&self) -> PlaybookApi<'_> {
        PlaybookApi::new(self)
    }

    // ========================================================================
    // Typed helpers for the resource proxies
    // ========================================================================

    /// URL of a whole admin resource, e.g. `admin/clients`.
    pub(crate) fn collection_url(&self, resource: &str) -> String {
        self.session.base_url().admin_url(resource)
    }

    /// URL of one item; `id` is encoded as a single path segment.
    pub(crate) fn item_url(&self, resource: &str, id: &str) -> Result<String> {
        self.session.base_url().admin_item_url(resource, id)
    }

    pub(crate) async fn get_json<R>(&self, url: String, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let mut request = Request::new(Method::GET, url);
        for (key, value) in query {
            request = request.with_query(*key, *value);
        }
        debug!(url = request.url(), "GET");
        self.send(request).await?.json()
    }

    pub(crate) async fn post_json<B, R>(&self, url: String, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let request = Request::new(Method::POST, url).with_body(Some(serde_json::to_value(body)?));
        debug!(url = request.url(), "POST");
        self.send(request).await?.json()
    }

    pub(crate) async fn post_no_response<B>(&self, url: String, body: &B) -> Result<()>
    where
        B: Serialize,
    {
        let request = Request::new(Method::POST, url).with_body(Some(serde_json::to_value(body)?));
        debug!(url = request.url(), "POST (no response)");
        self.send(request).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, url: String) -> Result<()> {
        debug!(url = url.as_str(), "DELETE");
        self.send(Request::new(Method::DELETE, url)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("session", &self.session)
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Configures a [`Gateway`].
pub struct GatewayBuilder {
    session: Arc<Session>,
    config: Option<GatewayConfig>,
    transport: Option<Arc<dyn Transport>>,
    sink: Arc<dyn NotificationSink>,
}

impl GatewayBuilder {
    fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            config: None,
            transport: None,
            sink: Arc::new(TracingSink),
        }
    }

    /// Transport settings; defaults to [`GatewayConfig::for_base_url`].
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Where failures are reported.
    pub fn notifier(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> Result<Gateway> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let config = self
                    .config
                    .unwrap_or_else(|| GatewayConfig::for_base_url(self.session.base_url()));
                Arc::new(HttpTransport::new(&config)?)
            }
        };

        let stages: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(ErrorReporter::new(self.sink)),
            Arc::new(TokenRefresher::new(self.session.clone())),
            Arc::new(AuthHeaders::new(self.session.clone())),
        ];

        Ok(Gateway {
            session: self.session,
            transport,
            stages,
        })
    }
}
