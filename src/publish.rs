//! Publisher — pushes the assembled map, replacing any prior one.
//!
//! The remote API has no atomic "replace contents" call, so an existing
//! map is first emptied with one update and then repopulated with a
//! second. A crash between the two leaves the map emptied until the next
//! run; acceptable for an import tool, but worth knowing.

use tracing::info;

use crate::layout::{MAP_HEIGHT, MAP_WIDTH};
use crate::zabbix::{ApiError, MapDefinition, MapElement, MapLink, ZabbixClient};

/// The map-level API surface the publisher drives.
#[async_trait::async_trait]
pub trait MapApi: Sync {
    async fn map_by_name(&self, name: &str) -> Result<Option<String>, ApiError>;
    async fn map_clear(&self, sysmapid: &str) -> Result<(), ApiError>;
    async fn map_update(&self, definition: &MapDefinition) -> Result<(), ApiError>;
    async fn map_create(&self, definition: &MapDefinition) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl MapApi for ZabbixClient {
    async fn map_by_name(&self, name: &str) -> Result<Option<String>, ApiError> {
        Self::map_by_name(self, name).await
    }

    async fn map_clear(&self, sysmapid: &str) -> Result<(), ApiError> {
        Self::map_clear(self, sysmapid).await
    }

    async fn map_update(&self, definition: &MapDefinition) -> Result<(), ApiError> {
        Self::map_update(self, definition).await
    }

    async fn map_create(&self, definition: &MapDefinition) -> Result<(), ApiError> {
        Self::map_create(self, definition).await
    }
}

/// How the publish finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Replaced,
}

/// Publish the assembled elements and links under `name`, replacing an
/// existing map of that name or creating a fresh one.
///
/// # Errors
///
/// Returns an [`ApiError`] if any of the map-level calls fail. Create and
/// replace failures propagate the same way.
pub async fn publish(
    api: &dyn MapApi,
    name: &str,
    elements: Vec<MapElement>,
    links: Vec<MapLink>,
) -> Result<PublishOutcome, ApiError> {
    let mut definition = MapDefinition::new(name, MAP_WIDTH, MAP_HEIGHT, elements, links);

    match api.map_by_name(name).await? {
        Some(sysmapid) => {
            info!(map = %name, sysmapid = %sysmapid, "replacing existing map");
            api.map_clear(&sysmapid).await?;
            definition.sysmapid = Some(sysmapid);
            api.map_update(&definition).await?;
            Ok(PublishOutcome::Replaced)
        }
        None => {
            info!(map = %name, "creating map");
            api.map_create(&definition).await?;
            Ok(PublishOutcome::Created)
        }
    }
}

#[cfg(test)]
#[path = "publish_test.rs"]
mod tests;
