//! HTTP transport.

use async_trait::async_trait;
use tracing::{debug, instrument};

use mvault_core::error::{Error, NetworkError};
use mvault_core::Result;

use crate::config::GatewayConfig;
use crate::request::Request;
use crate::response::Response;

/// Sends a request and returns whatever the server answered.
///
/// Implementations return `Ok` for every HTTP response, including error
/// statuses; only the absence of a response is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(network_error)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), url = request.url()))]
    async fn send(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.headers().clone());

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(network_error)?;

        debug!(%status, "request completed");
        Ok(Response::new(status, headers, body.to_vec()))
    }
}

/// Map a `reqwest` failure onto the network error taxonomy.
pub(crate) fn network_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_connect() {
        NetworkError::Connection {
            message: err.to_string(),
        }
    } else {
        NetworkError::Http {
            message: err.to_string(),
        }
    };
    Error::Network(err)
}
