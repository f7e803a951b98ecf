//! Error types for the micro-vault admin client.
//!
//! Failures split into the ones where no response arrived ([`NetworkError`]),
//! the ones the server answered with a non-success status ([`ApiError`]),
//! and the terminal failure of a token refresh ([`Error::RefreshFailed`]).

use std::fmt;
use thiserror::Error;

/// The unified error type for micro-vault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, TLS, connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// The server answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The token refresh call triggered by a 401 failed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(Box<Error>),

    /// Local authentication state problems.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A response body did not match the expected shape.
    #[error("cannot decode response: {message}")]
    Decode { message: String },

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the HTTP status carried by this error, if any.
    ///
    /// A refresh failure reports the status of the failed refresh call.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::RefreshFailed(cause) => cause.status(),
            _ => None,
        }
    }

    /// Returns true for a 401 answered by the server.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::Api(err) if err.kind() == ApiErrorKind::AuthExpired)
    }

    /// Returns true when the service refused to renew the session, as
    /// opposed to the renewal not getting through.
    ///
    /// Covers a refresh answered with 400, 401 or 403, a refresh answer
    /// without usable tokens, and a replay rejected despite fresh tokens.
    /// Timeouts, connection failures and 5xx answers are not rejections.
    pub fn is_session_rejected(&self) -> bool {
        match self {
            Error::RefreshFailed(cause) => match cause.as_ref() {
                Error::Api(err) => matches!(err.status, 400 | 401 | 403),
                Error::Decode { .. } | Error::Auth(_) => true,
                _ => false,
            },
            Error::Api(err) => err.kind() == ApiErrorKind::AuthExpired,
            _ => false,
        }
    }

    /// The one-line message handed to a notification sink.
    ///
    /// Formatted as `"<status> <key>"`, or `"<status>"` when the server sent
    /// no error key.
    pub fn report_message(&self) -> String {
        match self {
            Error::Api(err) => match &err.key {
                Some(key) => format!("{} {}", err.status, key),
                None => err.status.to_string(),
            },
            Error::RefreshFailed(cause) => cause.report_message(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}

/// Transport-level errors, raised when no HTTP response was received.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Any other failure of the HTTP stack.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Classification of an [`ApiError`] by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: the access token is missing or expired.
    AuthExpired,
    /// Any other 4xx.
    Client,
    /// 5xx.
    Server,
    /// A non-success status outside 4xx/5xx (e.g. an unfollowed redirect).
    Other,
}

/// An error answered by the micro-vault service.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine readable error key from the body (e.g. `name-conflict`).
    pub key: Option<String>,
    /// Human readable message from the body.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, key: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            key,
            message,
        }
    }

    /// Classify this error by its status.
    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            401 => ApiErrorKind::AuthExpired,
            400..=499 => ApiErrorKind::Client,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref key) = self.key {
            write!(f, " [{}]", key)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Authentication-related errors that never reached the server.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A login or refresh produced an empty token.
    #[error("empty {which} token")]
    EmptyToken { which: &'static str },

    /// No session is available.
    #[error("not logged in")]
    NotLoggedIn,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A header name or value that HTTP cannot carry.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Any other rejected value, e.g. a resource name that cannot be an
    /// item path segment.
    #[error("{message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_message_with_key() {
        let err = Error::from(ApiError::new(409, Some("name-conflict".into()), None));
        assert_eq!(err.report_message(), "409 name-conflict");
    }

    #[test]
    fn report_message_without_key() {
        let err = Error::from(ApiError::new(500, None, Some("boom".into())));
        assert_eq!(err.report_message(), "500");
    }

    #[test]
    fn refresh_failure_reports_its_cause() {
        let cause = Error::from(ApiError::new(403, Some("invalid-token".into()), None));
        let err = Error::RefreshFailed(Box::new(cause));
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.report_message(), "403 invalid-token");
    }

    #[test]
    fn rejected_refresh_is_told_apart_from_outage() {
        let refresh = |cause: Error| Error::RefreshFailed(Box::new(cause));

        assert!(refresh(ApiError::new(401, None, None).into()).is_session_rejected());
        assert!(refresh(ApiError::new(403, None, None).into()).is_session_rejected());
        assert!(refresh(AuthError::EmptyToken { which: "access" }.into()).is_session_rejected());
        assert!(
            refresh(Error::Decode {
                message: "missing field".into()
            })
            .is_session_rejected()
        );
        assert!(Error::from(ApiError::new(401, None, None)).is_session_rejected());

        assert!(!refresh(ApiError::new(503, None, None).into()).is_session_rejected());
        assert!(!refresh(NetworkError::Timeout.into()).is_session_rejected());
        assert!(!Error::from(ApiError::new(500, None, None)).is_session_rejected());
    }

    #[test]
    fn network_errors_have_no_status() {
        let err = Error::from(NetworkError::Timeout);
        assert_eq!(err.status(), None);
        assert_eq!(err.report_message(), "network error: request timed out");
    }

    #[test]
    fn classifies_status() {
        assert_eq!(ApiError::new(401, None, None).kind(), ApiErrorKind::AuthExpired);
        assert_eq!(ApiError::new(404, None, None).kind(), ApiErrorKind::Client);
        assert_eq!(ApiError::new(503, None, None).kind(), ApiErrorKind::Server);
        assert!(Error::from(ApiError::new(401, None, None)).is_auth_expired());
    }
}
