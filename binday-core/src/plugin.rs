//! Registry for all council plugins and their ports.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{CouncilId, CouncilMeta};
use crate::ports::{AddressPort, CollectionPort, ScrapeError};

/// Collection of ports implementing a provider for a single council.
pub struct CouncilPlugin {
    /// Static metadata describing the council.
    pub meta: CouncilMeta,
    /// Implementation for looking up addresses by postcode.
    pub address_port: Arc<dyn AddressPort>,
    /// Implementation for extracting collection schedules.
    pub collection_port: Arc<dyn CollectionPort>,
}

/// Registry that resolves plugins by council identifier.
pub struct PluginRegistry {
    plugins: HashMap<CouncilId, CouncilPlugin>,
}

impl PluginRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<CouncilPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered councils, sorted by display name.
    #[must_use]
    pub fn councils(&self) -> Vec<CouncilMeta> {
        let mut councils: Vec<CouncilMeta> = self
            .plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect();
        councils.sort_by(|left, right| left.name.cmp(&right.name));
        councils
    }

    /// Look up a plugin for the given council.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnsupportedCouncil`] when no plugin is registered.
    pub fn plugin(&self, council: &CouncilId) -> Result<&CouncilPlugin, ScrapeError> {
        self.plugins
            .get(council)
            .ok_or(ScrapeError::UnsupportedCouncil)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AddressResult, CollectionRecord, PostcodeQuery};

    struct NoopPort(CouncilMeta);

    #[async_trait]
    impl AddressPort for NoopPort {
        fn council(&self) -> &CouncilMeta {
            &self.0
        }

        async fn search(&self, _postcode: &PostcodeQuery) -> Result<Vec<AddressResult>, ScrapeError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl CollectionPort for NoopPort {
        fn council(&self) -> &CouncilMeta {
            &self.0
        }

        async fn collections(&self, _url: &str) -> Result<Vec<CollectionRecord>, ScrapeError> {
            Ok(Vec::new())
        }
    }

    fn noop_plugin(id: &str, name: &str) -> CouncilPlugin {
        let meta = CouncilMeta {
            id: CouncilId(id.to_owned()),
            name: name.to_owned(),
        };
        let port = Arc::new(NoopPort(meta.clone()));
        CouncilPlugin {
            meta,
            address_port: Arc::clone(&port) as Arc<dyn AddressPort>,
            collection_port: port,
        }
    }

    #[test]
    fn councils_are_listed_by_name() {
        let registry = PluginRegistry::new(vec![
            noop_plugin("wakefield", "Wakefield"),
            noop_plugin("barnsley", "Barnsley"),
        ]);

        let names: Vec<String> = registry
            .councils()
            .into_iter()
            .map(|meta| meta.name)
            .collect();

        assert_eq!(names, vec!["Barnsley".to_owned(), "Wakefield".to_owned()]);
    }

    #[test]
    fn unknown_council_is_unsupported() {
        let registry = PluginRegistry::new(vec![noop_plugin("wakefield", "Wakefield")]);

        assert!(
            registry.plugin(&CouncilId("wakefield".to_owned())).is_ok(),
            "registered council resolves"
        );
        assert!(
            matches!(
                registry.plugin(&CouncilId("leeds".to_owned())),
                Err(ScrapeError::UnsupportedCouncil)
            ),
            "unregistered council is rejected"
        );
    }
}
