//! Provider implementation for Wakefield Council's "Where I live" pages.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use binday_core::{
    document::{Document, DocumentError, DocumentProvider, Element},
    model::{AddressResult, CollectionRecord, CouncilMeta, Councils, PostcodeQuery},
    plugin::CouncilPlugin,
    ports::{AddressPort, CollectionPort, ScrapeError},
    session::Session,
};

mod addresses;
mod collections;

pub use addresses::lookup;
pub use collections::extract;

const DEFAULT_BASE_URL: &str = "https://www.wakefield.gov.uk/";
const LANDING_PATH: &str = "where-i-live/";

/// Title marker of the landing page and of every property page.
pub(crate) const WHERE_I_LIVE_MARKER: &str = "Where";
/// Title marker of the address pick list shown after a search.
pub(crate) const PICK_ADDRESS_MARKER: &str = "Pick";

#[derive(Debug, Clone)]
/// Location of the council site.
pub struct WakefieldConfig {
    /// Origin that relative property links are resolved against.
    pub base_url: Url,
}

impl WakefieldConfig {
    /// Point the provider at another origin, e.g. a mirror or a fixture server.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// URL of the postcode search page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidUrl`] when the base URL cannot carry a path.
    pub fn landing_url(&self) -> Result<Url, ScrapeError> {
        Ok(self.base_url.join(LANDING_PATH)?)
    }
}

impl Default for WakefieldConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}

/// Read a page title and make sure it is the page we navigated to.
pub(crate) async fn expect_title(
    document: &mut dyn Document,
    marker: &'static str,
) -> Result<(), ScrapeError> {
    let title = document.title().await?;
    if title.contains(marker) {
        Ok(())
    } else {
        Err(ScrapeError::UnexpectedPage {
            expected: marker,
            title,
        })
    }
}

/// Turn a failed lookup of a required element into a fatal extraction error.
pub(crate) fn required(found: Result<Element, DocumentError>) -> Result<Element, ScrapeError> {
    found.map_err(|err| match err {
        DocumentError::NotFound { selector } => ScrapeError::MissingElement(selector),
        other => other.into(),
    })
}

/// Treat "nothing matched" as absence; every other failure stays fatal.
pub(crate) fn optional(found: Result<Element, DocumentError>) -> Result<Option<Element>, ScrapeError> {
    match found {
        Ok(element) => Ok(Some(element)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Address lookup implementation for Wakefield.
pub struct WakefieldAddressPort {
    provider: Arc<dyn DocumentProvider>,
    config: WakefieldConfig,
    meta: CouncilMeta,
}

impl WakefieldAddressPort {
    /// Create a new address port opening sessions from the given document provider.
    #[must_use]
    pub fn new(provider: Arc<dyn DocumentProvider>, config: WakefieldConfig) -> Self {
        Self {
            provider,
            config,
            meta: council_meta(),
        }
    }
}

#[async_trait]
impl AddressPort for WakefieldAddressPort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn search(&self, postcode: &PostcodeQuery) -> Result<Vec<AddressResult>, ScrapeError> {
        if postcode.is_empty() {
            return Ok(Vec::new());
        }

        let mut session = Session::open(self.provider.as_ref()).await?;
        let result = lookup(session.document(), &self.config, postcode).await;
        session.finish(result).await
    }
}

/// Collection schedule implementation for Wakefield.
pub struct WakefieldCollectionPort {
    provider: Arc<dyn DocumentProvider>,
    meta: CouncilMeta,
}

impl WakefieldCollectionPort {
    /// Create a new collection port opening sessions from the given document provider.
    #[must_use]
    pub fn new(provider: Arc<dyn DocumentProvider>) -> Self {
        Self {
            provider,
            meta: council_meta(),
        }
    }
}

#[async_trait]
impl CollectionPort for WakefieldCollectionPort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn collections(&self, url: &str) -> Result<Vec<CollectionRecord>, ScrapeError> {
        let url = Url::parse(url)?;

        let mut session = Session::open(self.provider.as_ref()).await?;
        let result = extract(session.document(), &url).await;
        session.finish(result).await
    }
}

/// Build the plugin bundle for the Wakefield provider.
#[must_use]
pub fn plugin(provider: Arc<dyn DocumentProvider>, config: WakefieldConfig) -> CouncilPlugin {
    let address_port = Arc::new(WakefieldAddressPort::new(Arc::clone(&provider), config));
    let collection_port = Arc::new(WakefieldCollectionPort::new(provider));

    CouncilPlugin {
        meta: council_meta(),
        address_port,
        collection_port,
    }
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: Councils::Wakefield.into(),
        name: String::from("Wakefield"),
    }
}
