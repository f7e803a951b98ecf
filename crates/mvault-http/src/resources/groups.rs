//! `admin/groups`

use tracing::instrument;

use mvault_core::{Group, Result};

use crate::gateway::Gateway;

const GROUPS: &str = "groups";

/// Client groups.
#[derive(Debug, Clone, Copy)]
pub struct GroupsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> GroupsApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Group> {
        self.gateway.get_json(self.gateway.item_url(GROUPS, name)?, &[]).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Group>> {
        self.gateway.get_json(self.gateway.collection_url(GROUPS), &[]).await
    }

    /// Store a group. The service answers with no body.
    #[instrument(skip(self))]
    pub async fn create(&self, group: &Group) -> Result<()> {
        self.gateway.post_no_response(self.gateway.collection_url(GROUPS), group).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.gateway.delete(self.gateway.item_url(GROUPS, name)?).await
    }
}
