//! `admin/playbook`

use tracing::instrument;

use mvault_core::Result;

use crate::gateway::Gateway;

const PLAYBOOK: &str = "playbook";

/// Bulk provisioning of groups and clients.
#[derive(Debug, Clone, Copy)]
pub struct PlaybookApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> PlaybookApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Upload a playbook and let the service execute it.
    #[instrument(skip(self, playbook))]
    pub async fn upload(&self, playbook: &serde_json::Value) -> Result<()> {
        self.gateway.post_no_response(self.gateway.collection_url(PLAYBOOK), playbook).await
    }
}
