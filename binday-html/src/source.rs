//! Page sources for [`crate::HtmlDocument`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use binday_core::DocumentError;
use reqwest::Client;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Navigation request issued by a document.
pub enum PageRequest {
    /// Plain navigation or GET form submission.
    Get(Url),
    /// POST form submission with url-encoded fields.
    PostForm {
        /// Form target.
        url: Url,
        /// Name/value pairs in form order.
        fields: Vec<(String, String)>,
    },
}

impl PageRequest {
    /// Target URL of the request.
    #[must_use]
    pub fn url(&self) -> &Url {
        match self {
            PageRequest::Get(url) | PageRequest::PostForm { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone)]
/// Body of a loaded page and the URL it was finally served from.
pub struct FetchedPage {
    /// URL after redirects.
    pub url: Url,
    /// HTML source.
    pub body: String,
}

#[async_trait]
/// Anything that can answer a [`PageRequest`] with HTML.
pub trait PageSource: Send {
    /// Retrieve the page for a request.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the page cannot be retrieved.
    async fn fetch(&mut self, request: PageRequest) -> Result<FetchedPage, DocumentError>;
}

/// Live pages fetched with a shared HTTP client.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Create a source bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&mut self, request: PageRequest) -> Result<FetchedPage, DocumentError> {
        debug!(url = %request.url(), "fetching page");

        let builder = match request {
            PageRequest::Get(url) => self.client.get(url),
            PageRequest::PostForm { url, fields } => self.client.post(url).form(&fields),
        };
        let response = builder.send().await?;

        let status = response.status();
        let url = response.url().clone();
        if !status.is_success() {
            return Err(DocumentError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(FetchedPage { url, body })
    }
}

/// Fixed pages keyed by URL, for tests and offline replays.
///
/// POST submissions are looked up like GET requests with the fields as query string.
#[derive(Clone, Default)]
pub struct StaticSource {
    pages: Arc<HashMap<String, String>>,
}

impl StaticSource {
    /// Create a source over a shared page map keyed by serialized URL.
    #[must_use]
    pub fn new(pages: Arc<HashMap<String, String>>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch(&mut self, request: PageRequest) -> Result<FetchedPage, DocumentError> {
        let url = match request {
            PageRequest::Get(url) => url,
            PageRequest::PostForm { mut url, fields } => {
                url.query_pairs_mut().extend_pairs(fields);
                url
            }
        };

        match self.pages.get(url.as_str()) {
            Some(body) => Ok(FetchedPage {
                body: body.clone(),
                url,
            }),
            None => Err(DocumentError::PageUnavailable(url)),
        }
    }
}
