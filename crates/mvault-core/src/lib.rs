//! mvault-core - Core types for the micro-vault admin client.
//!
//! This crate holds everything that does not need a network stack: the
//! shared [`Session`] store, token and credential types, the validated
//! [`BaseUrl`], the admin resource models, the error taxonomy and the
//! [`NotificationSink`] seam used to surface failures to a user.

pub mod credentials;
pub mod error;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use session::Session;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{NotificationSink, Severity, TracingSink};
pub use types::{BaseUrl, Client, Group, GroupKey, NewClient};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
