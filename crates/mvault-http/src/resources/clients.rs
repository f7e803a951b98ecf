//! `admin/clients`

use tracing::instrument;

use mvault_core::{Client, NewClient, Result};

use crate::gateway::Gateway;

const CLIENTS: &str = "clients";

/// Registered service clients.
#[derive(Debug, Clone, Copy)]
pub struct ClientsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> ClientsApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Client> {
        self.gateway
            .get_json(self.gateway.item_url(CLIENTS, name)?, &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Client>> {
        self.gateway.get_json(self.gateway.collection_url(CLIENTS), &[]).await
    }

    /// Clients that are members of `group`.
    #[instrument(skip(self))]
    pub async fn for_group(&self, group: &str) -> Result<Vec<Client>> {
        self.gateway.get_json(self.gateway.collection_url(CLIENTS), &[("group", group)]).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.gateway.delete(self.gateway.item_url(CLIENTS, name)?).await
    }

    /// Register a client. The returned value carries the generated access
    /// key and secret; the secret is not retrievable later.
    #[instrument(skip(self))]
    pub async fn create(&self, client: &NewClient) -> Result<Client> {
        self.gateway.post_json(self.gateway.collection_url(CLIENTS), client).await
    }
}
