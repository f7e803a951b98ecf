//! Service base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1")
}

/// A validated micro-vault service base URL, e.g. `https://vault:8443/api/v1/`.
///
/// The URL must be absolute and use HTTPS (HTTP is accepted for localhost
/// only). It is normalized to end with `/` so that endpoint paths are plain
/// suffixes.
///
/// # Example
///
/// ```
/// use mvault_core::BaseUrl;
///
/// let base = BaseUrl::new("https://vault.example.com/api/v1").unwrap();
/// assert_eq!(base.admin_url("groups"), "https://vault.example.com/api/v1/admin/groups");
/// assert_eq!(base.refresh_url(), "https://vault.example.com/api/v1/login/refresh");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidInputError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the URL of an admin resource path, e.g. `clients/alice`.
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}admin/{}", self.0, path.trim_start_matches('/'))
    }

    /// Returns the URL of one item of an admin resource, e.g. client `alice`.
    ///
    /// `id` always stays a single path segment: `/`, `?`, `#` and `%` are
    /// percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty id, `.` or `..`, which cannot name an
    /// item.
    pub fn admin_item_url(&self, resource: &str, id: &str) -> Result<String, Error> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(InvalidInputError::Other {
                message: format!("'{id}' is not a valid {resource} name"),
            }
            .into());
        }

        let mut url = self.0.clone();
        url.path_segments_mut()
            .map_err(|()| InvalidInputError::BaseUrl {
                value: self.0.to_string(),
                reason: "cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(["admin", resource.trim_matches('/'), id]);
        Ok(url.into())
    }

    /// Returns the login endpoint URL.
    pub fn login_url(&self) -> String {
        format!("{}login", self.0)
    }

    /// Returns the token refresh endpoint URL.
    pub fn refresh_url(&self) -> String {
        format!("{}login/refresh", self.0)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the host is a loopback address.
    pub fn is_loopback(&self) -> bool {
        self.0.host_str().is_some_and(is_loopback_host)
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_localhost = url.host_str().is_some_and(is_loopback_host);

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
