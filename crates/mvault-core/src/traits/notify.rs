//! User-facing notification sink.

use std::fmt;

use tracing::{error, info, warn};

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Receives messages meant for the person operating the client.
///
/// The gateway calls this for every reportable failure; a front end decides
/// how to present it (toast, coloured console line, log entry).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    fn success(&self, message: &str) {
        self.notify(Severity::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Sink that forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!(target: "mvault::notify", "service success: {message}"),
            Severity::Warning => warn!(target: "mvault::notify", "service warning: {message}"),
            Severity::Error => error!(target: "mvault::notify", "service error: {message}"),
        }
    }
}
