//! Wire types for the login endpoints and error bodies.

use serde::{Deserialize, Serialize};

/// Request body for `POST {base}login`.
///
/// The service decodes `pwd` as a byte array, so it travels base64 encoded.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: &'a str,
    pub pwd: String,
}

/// Response from login and `GET {base}login/refresh`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub token_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub expires_in: Option<i64>,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}
