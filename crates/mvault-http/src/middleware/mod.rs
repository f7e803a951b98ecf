//! Request pipeline.
//!
//! A gateway holds an ordered list of [`Middleware`] stages and a
//! [`Transport`]. Each stage receives the request together with a [`Next`]
//! handle for the remaining stages; it may rewrite the request before calling
//! [`Next::run`], inspect or replace the outcome afterwards, call it a second
//! time, or not call it at all.

mod auth;
mod refresh;
mod report;

use std::sync::Arc;

use async_trait::async_trait;

use mvault_core::Result;

use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;

pub use auth::AuthHeaders;
pub use refresh::TokenRefresher;
pub use report::ErrorReporter;

/// One stage of the request pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Response>;
}

/// The remainder of the pipeline as seen from one stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a dyn Transport,
    stages: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, stages: &'a [Arc<dyn Middleware>]) -> Self {
        Self { transport, stages }
    }

    /// Run the remaining stages and the transport.
    ///
    /// Non-success statuses come back as [`mvault_core::Error::Api`].
    pub async fn run(self, request: Request) -> Result<Response> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(request, Next::new(self.transport, rest)).await,
            None => self.transport.send(&request).await?.into_result(),
        }
    }

    /// The bare transport, for calls that must bypass the pipeline.
    pub fn transport(&self) -> &'a dyn Transport {
        self.transport
    }
}
