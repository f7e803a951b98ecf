//! Console presentation of gateway notifications.

use tracing::debug;

use mvault_core::{NotificationSink, Severity};

use crate::output;

/// Prints success and warning notifications on the terminal.
///
/// Error notifications are only logged: every failed request also fails its
/// command, and `main` prints that error once with its context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => output::success(message),
            Severity::Warning => output::warning(message),
            Severity::Error => debug!(target: "mvault::notify", "service error: {message}"),
        }
    }
}
