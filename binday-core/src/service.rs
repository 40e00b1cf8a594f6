//! High-level service facade combining all council providers.

use std::sync::Arc;

use tracing::info;

use crate::model::{AddressResult, CollectionRecord, CouncilId, PostcodeQuery};
use crate::plugin::PluginRegistry;
use crate::ports::ScrapeError;

/// Public entry point for looking up addresses and collection schedules.
pub struct BindayService {
    registry: Arc<PluginRegistry>,
}

impl BindayService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// List all available councils and their display names.
    #[must_use]
    pub fn councils(&self) -> Vec<(CouncilId, String)> {
        self.registry
            .councils()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Look up the properties registered at a postcode.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] if the council is unsupported or its search page is
    /// unusable. An unknown postcode yields an empty list.
    pub async fn lookup_addresses(
        &self,
        council: &CouncilId,
        postcode: &PostcodeQuery,
    ) -> Result<Vec<AddressResult>, ScrapeError> {
        let plugin = self.registry.plugin(council)?;
        let addresses = plugin.address_port.search(postcode).await?;
        info!(%council, %postcode, count = addresses.len(), "address lookup finished");
        Ok(addresses)
    }

    /// Extract the collection schedule from a property page.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] if the council is unsupported, the page is not a collection
    /// page, or its content cannot be classified or parsed.
    pub async fn extract_collections(
        &self,
        council: &CouncilId,
        url: &str,
    ) -> Result<Vec<CollectionRecord>, ScrapeError> {
        let plugin = self.registry.plugin(council)?;
        let records = plugin.collection_port.collections(url).await?;
        info!(%council, url, streams = records.len(), "collection extraction finished");
        Ok(records)
    }
}
