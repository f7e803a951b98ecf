//! Outbound request type.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use mvault_core::Result;
use mvault_core::error::InvalidInputError;

/// Per-request switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Neither notify nor refresh on failure; the error is returned as is.
    pub omit_error_reporting: bool,
}

impl RequestOptions {
    /// Options for a call whose failures the caller handles silently.
    pub fn silent() -> Self {
        Self {
            omit_error_reporting: true,
        }
    }
}

/// A single call to the service, as it travels through the pipeline.
///
/// Headers set here are explicit and take precedence over the defaults the
/// gateway injects.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    options: RequestOptions,
}

impl Request {
    /// Create a request for an absolute URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set an explicit header.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value is not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn options(&self) -> RequestOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn header_names_are_case_insensitive() {
        let request = Request::new(Method::GET, "https://vault.example.com/api/v1/admin/groups")
            .with_header("authorization", "Bearer explicit")
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer explicit");
    }

    #[test]
    fn rejects_invalid_header_value() {
        let result = Request::new(Method::GET, "https://vault.example.com/")
            .with_header("X-Test", "line\nbreak");
        assert!(result.is_err());
    }

    #[test]
    fn silent_options() {
        let request = Request::new(Method::DELETE, "https://vault.example.com/")
            .with_options(RequestOptions::silent());
        assert!(request.options().omit_error_reporting);
        assert!(request.body().is_none());
    }
}
