//! Failure reporting.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mvault_core::{NotificationSink, Result, Severity};

use super::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// Sends one `error` notification per failed request, formatted as
/// `"<status> <key>"`, unless the request opted out. The failure is always
/// returned to the caller.
pub struct ErrorReporter {
    sink: Arc<dyn NotificationSink>,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Middleware for ErrorReporter {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let omit = request.options().omit_error_reporting;
        let result = next.run(request).await;

        if let Err(err) = &result {
            if omit {
                debug!(error = %err, "request failed, reporting omitted");
            } else {
                self.sink.notify(Severity::Error, &err.report_message());
            }
        }
        result
    }
}
