//! Authorization headers and the token endpoints.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use mvault_core::error::InvalidInputError;
use mvault_core::{Credentials, Result, Session};

use crate::endpoints::{LoginRequest, TokenResponse};
use crate::request::Request;
use crate::transport::Transport;

/// `Bearer <token>` as a sensitive header value.
pub(crate) fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
        InvalidInputError::Header {
            name: AUTHORIZATION.to_string(),
            reason: e.to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// The Authorization header for the current access token, if there is one.
pub(crate) fn auth_headers(session: &Session) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let token = session.access_token();
    if !token.is_empty() {
        headers.insert(AUTHORIZATION, bearer(token.as_str())?);
    }
    Ok(headers)
}

/// Defaults for a request: auth header, plus the JSON content type on
/// methods that carry a body.
pub(crate) fn default_headers(session: &Session, method: &Method) -> Result<HeaderMap> {
    let mut headers = auth_headers(session)?;
    if *method == Method::POST || *method == Method::PUT || *method == Method::PATCH {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

/// Overlay explicit headers on defaults. Every name present in `explicit`
/// replaces all default values of that name.
pub(crate) fn merge_headers(mut defaults: HeaderMap, explicit: &HeaderMap) -> HeaderMap {
    for name in explicit.keys() {
        defaults.remove(name);
    }
    for (name, value) in explicit {
        defaults.append(name.clone(), value.clone());
    }
    defaults
}

/// Log in with credentials and store the issued tokens in the session.
#[instrument(skip_all, fields(user = credentials.user()))]
pub(crate) async fn login(
    session: &Session,
    transport: &dyn Transport,
    credentials: &Credentials,
) -> Result<()> {
    let body = LoginRequest {
        user: credentials.user(),
        pwd: STANDARD.encode(credentials.password()),
    };
    let request = Request::new(Method::POST, session.base_url().login_url())
        .with_body(Some(serde_json::to_value(&body)?));

    let response = transport.send(&request).await?.into_result()?;
    let tokens: TokenResponse = response.json()?;
    session.after_login(tokens.access_token, tokens.refresh_token)?;

    debug!("logged in");
    Ok(())
}

/// Exchange the refresh token for a new token pair.
///
/// Sent straight to the transport: the refresh call has no token of its own
/// to renew.
#[instrument(skip_all)]
pub(crate) async fn refresh_tokens(session: &Session, transport: &dyn Transport) -> Result<()> {
    let mut request = Request::new(Method::GET, session.base_url().refresh_url());
    let refresh_token = session.refresh_token();
    if !refresh_token.is_empty() {
        request
            .headers_mut()
            .insert(AUTHORIZATION, bearer(refresh_token.as_str())?);
    }

    let response = transport.send(&request).await?.into_result()?;
    let tokens: TokenResponse = response.json()?;
    session.after_login(tokens.access_token, tokens.refresh_token)?;

    debug!("tokens refreshed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvault_core::BaseUrl;

    fn session() -> Session {
        Session::new(BaseUrl::new("https://vault.example.com/api/v1/").unwrap())
    }

    #[test]
    fn no_auth_header_without_token() {
        assert!(auth_headers(&session()).unwrap().is_empty());
    }

    #[test]
    fn bearer_header_from_token() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        let headers = auth_headers(&session).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer acc1");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn content_type_only_for_body_methods() {
        let session = session();
        assert!(default_headers(&session, &Method::GET).unwrap().get(CONTENT_TYPE).is_none());
        assert_eq!(
            default_headers(&session, &Method::POST).unwrap()[CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn explicit_headers_win() {
        let session = session();
        session.after_login("acc1", "ref1").unwrap();
        let mut explicit = HeaderMap::new();
        explicit.insert("authorization", HeaderValue::from_static("Bearer mine"));
        explicit.insert("x-trace", HeaderValue::from_static("42"));

        let merged = merge_headers(auth_headers(&session).unwrap(), &explicit);

        assert_eq!(merged.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(merged[AUTHORIZATION], "Bearer mine");
        assert_eq!(merged["x-trace"], "42");
    }
}
