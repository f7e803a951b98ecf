//! Core traits.

mod notify;

pub use notify::{NotificationSink, Severity, TracingSink};
