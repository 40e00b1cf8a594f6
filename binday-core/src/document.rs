//! Port over a loaded, navigable page as produced by a browser-automation layer.
//!
//! Extraction code talks only to [`Document`]; any backend able to load a URL, evaluate CSS
//! selectors, and simulate clicks and keystrokes can drive it. Every operation takes
//! `&mut self`, so a session performs one interaction at a time.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use url::{ParseError as UrlParseError, Url};

#[derive(thiserror::Error, Debug)]
/// Failures reported by a document backend.
pub enum DocumentError {
    /// No element matched the selector.
    #[error("No element matches `{selector}`")]
    NotFound {
        /// Selector that found nothing.
        selector: String,
    },
    /// The selector could not be parsed.
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// Offending selector.
        selector: String,
        /// Parser message.
        reason: String,
    },
    /// The element handle belongs to a page that is no longer loaded.
    #[error("Stale element handle")]
    StaleElement,
    /// An element query ran before any page was loaded.
    #[error("No page loaded")]
    NoPage,
    /// The session was already closed.
    #[error("Session closed")]
    Closed,
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The server answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested URL.
        url: Url,
        /// HTTP status code.
        status: u16,
    },
    /// The backend has no page for this URL.
    #[error("No page available at {0}")]
    PageUnavailable(Url),
    /// A link or form target could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlParseError),
    /// The backend cannot perform the requested interaction.
    #[error("Unsupported interaction: {0}")]
    Unsupported(String),
}

impl DocumentError {
    /// Whether the error only says that nothing matched a selector.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::NotFound { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Opaque handle to an element of the currently loaded page.
///
/// Handles stay valid until the session navigates; afterwards the backend rejects them
/// with [`DocumentError::StaleElement`].
pub struct Element {
    page: u64,
    node: usize,
}

impl Element {
    /// Build a handle. Only document backends should need this.
    #[must_use]
    pub fn new(page: u64, node: usize) -> Self {
        Self { page, node }
    }

    /// Navigation counter of the page the element belongs to.
    #[must_use]
    pub fn page(self) -> u64 {
        self.page
    }

    /// Backend-specific node index within that page.
    #[must_use]
    pub fn node(self) -> usize {
        self.node
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Special keys that can be sent to an element.
pub enum Key {
    /// Return/Enter, submits the enclosing form.
    Enter,
}

#[async_trait]
/// A loaded, navigable page and the user interactions the extractors need.
pub trait Document: Send {
    /// Navigate to `url`; later queries reflect the loaded page.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the page cannot be loaded.
    async fn load(&mut self, url: &Url) -> Result<(), DocumentError>;

    /// URL of the loaded page.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoPage`] before the first load.
    async fn current_url(&mut self) -> Result<Url, DocumentError>;

    /// Title text of the loaded page.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoPage`] before the first load.
    async fn title(&mut self) -> Result<String, DocumentError>;

    /// First visible element matching `selector`, searched below `within` or in the whole page.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] when nothing matches.
    async fn find_one(
        &mut self,
        within: Option<Element>,
        selector: &str,
    ) -> Result<Element, DocumentError>;

    /// All visible elements matching `selector` in document order; empty when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] for invalid selectors or stale scopes.
    async fn find_all(
        &mut self,
        within: Option<Element>,
        selector: &str,
    ) -> Result<Vec<Element>, DocumentError>;

    /// Rendered text of the element with whitespace collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::StaleElement`] for handles of a previous page.
    async fn text_of(&mut self, element: Element) -> Result<String, DocumentError>;

    /// Value of an attribute, `None` when the element lacks it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::StaleElement`] for handles of a previous page.
    async fn attribute_of(
        &mut self,
        element: Element,
        name: &str,
    ) -> Result<Option<String>, DocumentError>;

    /// Empty an input field.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the element cannot take input.
    async fn clear(&mut self, element: Element) -> Result<(), DocumentError>;

    /// Type text into an input field after its current value.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the element cannot take input.
    async fn type_into(&mut self, element: Element, text: &str) -> Result<(), DocumentError>;

    /// Send a special key to an element.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the key has no effect the backend can perform,
    /// or when the resulting navigation fails.
    async fn submit_keystroke(&mut self, element: Element, key: Key) -> Result<(), DocumentError>;

    /// Activate an element the way a script-issued click does, including elements that are
    /// not natively clickable.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the click triggers a navigation that fails.
    async fn click(&mut self, element: Element) -> Result<(), DocumentError>;

    /// Release the session. Every later call fails with [`DocumentError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the backend fails to release its resources.
    async fn close(&mut self) -> Result<(), DocumentError>;
}

#[async_trait]
/// Source of fresh document sessions.
pub trait DocumentProvider: Send + Sync {
    /// Acquire a new session. The caller must [`Document::close`] it when done.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when no session can be started.
    async fn open(&self) -> Result<Box<dyn Document>, DocumentError>;
}
