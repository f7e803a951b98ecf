//! Admin resource models as exchanged with the service.
//!
//! Every field defaults when absent so newer servers can add fields, or drop
//! optional ones, without breaking decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A group of clients sharing encryption keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub name: String,
    pub label: BTreeMap<String, String>,
    /// Set for the implicit per-client group.
    #[serde(rename = "isclient", skip_serializing_if = "std::ops::Not::not")]
    pub is_client: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Group {
    /// Create a group with no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a label, builder style.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.label.insert(key.into(), value.into());
        self
    }
}

/// A service client registered with the vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    #[serde(rename = "accesskey")]
    pub access_key: String,
    /// Only populated in the response that created the client.
    pub secret: String,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// Request body for creating a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClient {
    pub name: String,
    pub groups: Vec<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }
}

/// Public information about a group encryption key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupKey {
    pub alg: String,
    pub id: String,
    pub group: String,
    pub key: String,
    pub created: String,
}
