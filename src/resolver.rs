//! Resolver — the capability that turns symbolic names into server ids.
//!
//! Built once in `main` and passed into assembly as a trait object, so the
//! transform can be tested against an in-memory fake. The icon catalog is
//! the only cached lookup: it is fetched in one call up front, host and
//! sub-map names go to the server one at a time.

use std::collections::HashMap;

use crate::zabbix::{ApiError, ZabbixClient};

/// Name-to-id resolution against the monitoring server.
#[async_trait::async_trait]
pub trait Resolve: Sync {
    /// Resolve a monitored host name. Unknown hosts are `Ok(None)`.
    async fn host_id(&self, hostname: &str) -> Result<Option<String>, ApiError>;

    /// Resolve a sub-map name. Unknown maps are `Ok(None)`.
    async fn submap_id(&self, name: &str) -> Result<Option<String>, ApiError>;

    /// Resolve an icon name against the preloaded catalog.
    fn icon_id(&self, name: &str) -> Option<String>;
}

pub struct ZabbixResolver<'a> {
    client: &'a ZabbixClient,
    icons: HashMap<String, String>,
}

impl<'a> ZabbixResolver<'a> {
    /// Build a resolver over an authenticated client, fetching the icon
    /// catalog once.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the catalog fetch fails.
    pub async fn load(client: &'a ZabbixClient) -> Result<Self, ApiError> {
        let icons = client.image_catalog().await?;
        Ok(Self { client, icons })
    }

    /// Number of icons in the loaded catalog.
    #[must_use]
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }
}

#[async_trait::async_trait]
impl Resolve for ZabbixResolver<'_> {
    async fn host_id(&self, hostname: &str) -> Result<Option<String>, ApiError> {
        self.client.host_by_name(hostname).await
    }

    async fn submap_id(&self, name: &str) -> Result<Option<String>, ApiError> {
        self.client.map_by_name(name).await
    }

    fn icon_id(&self, name: &str) -> Option<String> {
        self.icons.get(name).cloned()
    }
}
