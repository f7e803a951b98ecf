//! Response type.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::trace;

use mvault_core::Result;
use mvault_core::error::ApiError;

use crate::endpoints::ErrorBody;

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`mvault_core::Error::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-success status into an [`ApiError`].
    pub fn into_result(self) -> Result<Self> {
        trace!(status = %self.status, "response");

        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.api_error().into())
        }
    }

    fn api_error(&self) -> ApiError {
        let status = self.status.as_u16();

        match serde_json::from_slice::<ErrorBody>(&self.body) {
            Ok(body) => ApiError::new(status, body.key, body.message),
            Err(_) => ApiError::new(status, None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvault_core::Error;

    fn response(status: u16, body: &str) -> Response {
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn success_passes_through() {
        let response = response(200, r#"{"name":"group1"}"#).into_result().unwrap();
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "group1");
    }

    #[test]
    fn error_body_key_is_extracted() {
        let err = response(409, r#"{"key":"name-conflict","message":"exists"}"#)
            .into_result()
            .unwrap_err();
        match err {
            Error::Api(api) => {
                assert_eq!(api.status, 409);
                assert_eq!(api.key.as_deref(), Some("name-conflict"));
                assert_eq!(api.message.as_deref(), Some("exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body() {
        let err = response(500, "Internal Server Error").into_result().unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.report_message(), "500");
    }

    #[test]
    fn decode_failure() {
        let err = response(200, "not json").json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
