//! Traits describing provider capabilities and the extraction error type.

use async_trait::async_trait;
use url::ParseError as UrlParseError;

use crate::document::DocumentError;
use crate::model::{AddressResult, CollectionRecord, CouncilMeta, PostcodeQuery};

#[derive(thiserror::Error, Debug)]
/// Errors that abort an extraction or lookup call.
///
/// None of them are recoverable per section: a result list is either complete or absent.
pub enum ScrapeError {
    /// The loaded page is not the one the extractor expects.
    #[error("Unexpected page: title {title:?} does not contain {expected:?}")]
    UnexpectedPage {
        /// Marker the title should contain.
        expected: &'static str,
        /// Title actually found.
        title: String,
    },
    /// A section label is not one of the known waste streams.
    #[error("Unknown bin type: {0}")]
    UnknownBinType(String),
    /// Date text does not match the expected format.
    #[error("Unknown date format: {0}")]
    DateFormat(String),
    /// Text lacks the separator the page layout promises.
    #[error("Expected {separator:?} in {text:?}")]
    MalformedText {
        /// Separator that was looked for.
        separator: &'static str,
        /// Text as read from the page.
        text: String,
    },
    /// A required part of the page is missing.
    #[error("Missing page element: {0}")]
    MissingElement(String),
    /// A URL given by the caller or the page is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlParseError),
    /// The council has no registered plugin.
    #[error("Unsupported council")]
    UnsupportedCouncil,
    /// The document backend failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

#[async_trait]
/// Trait for council-specific address search backends.
pub trait AddressPort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// List the properties registered at a postcode, in page order.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] when the search page cannot be used. An unknown postcode is
    /// not an error and yields an empty list.
    async fn search(&self, postcode: &PostcodeQuery) -> Result<Vec<AddressResult>, ScrapeError>;
}

#[async_trait]
/// Trait for council-specific collection schedule backends.
pub trait CollectionPort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// Extract one record per waste stream from a property's collection page.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] on a wrong page, an unknown stream label, or unparseable
    /// date text. No partial results are returned.
    async fn collections(&self, url: &str) -> Result<Vec<CollectionRecord>, ScrapeError>;
}
