//! `admin/groupkeys`

use serde::Serialize;
use tracing::instrument;

use mvault_core::{GroupKey, Result};

use crate::gateway::Gateway;

const GROUP_KEYS: &str = "groupkeys";

#[derive(Debug, Serialize)]
struct CreateGroupKey<'a> {
    group: &'a str,
}

/// Group encryption keys.
#[derive(Debug, Clone, Copy)]
pub struct GroupKeysApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> GroupKeysApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<GroupKey> {
        self.gateway
            .get_json(self.gateway.item_url(GROUP_KEYS, id)?, &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<GroupKey>> {
        self.gateway.get_json(self.gateway.collection_url(GROUP_KEYS), &[]).await
    }

    #[instrument(skip(self))]
    pub async fn for_group(&self, group: &str) -> Result<Vec<GroupKey>> {
        self.gateway
            .get_json(self.gateway.collection_url(GROUP_KEYS), &[("group", group)])
            .await
    }

    /// Generate a new key for `group`.
    #[instrument(skip(self))]
    pub async fn create(&self, group: &str) -> Result<GroupKey> {
        self.gateway
            .post_json(self.gateway.collection_url(GROUP_KEYS), &CreateGroupKey { group })
            .await
    }
}
