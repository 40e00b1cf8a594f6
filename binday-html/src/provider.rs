//! Session factories for the HTML backends.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use binday_core::{Document, DocumentError, DocumentProvider};
use reqwest::Client;
use url::Url;

use crate::document::HtmlDocument;
use crate::source::{HttpSource, StaticSource};

/// Opens sessions that fetch live pages over HTTP.
pub struct HttpDocumentProvider {
    client: Client,
}

impl HttpDocumentProvider {
    /// Create a provider whose sessions share the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentProvider for HttpDocumentProvider {
    async fn open(&self) -> Result<Box<dyn Document>, DocumentError> {
        Ok(Box::new(HtmlDocument::new(HttpSource::new(
            self.client.clone(),
        ))))
    }
}

/// Opens sessions over a fixed set of in-memory pages.
#[derive(Clone, Default)]
pub struct StaticDocumentProvider {
    pages: Arc<HashMap<String, String>>,
}

impl StaticDocumentProvider {
    /// Create a provider without pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` whenever `url` is requested.
    #[must_use]
    pub fn with_page(mut self, url: &Url, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.as_str().to_owned(), html.into());
        self
    }
}

#[async_trait]
impl DocumentProvider for StaticDocumentProvider {
    async fn open(&self) -> Result<Box<dyn Document>, DocumentError> {
        Ok(Box::new(HtmlDocument::new(StaticSource::new(Arc::clone(
            &self.pages,
        )))))
    }
}
