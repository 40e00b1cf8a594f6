//! Document backends that drive binday extractors from plain HTML.
//!
//! [`HtmlDocument`] parses each loaded page and emulates the few browser behaviours the
//! extractors rely on: content behind the `hidden` attribute stays invisible until a control
//! reveals it, links and forms navigate, and inputs keep typed values. Pages come from a
//! [`PageSource`], either live over HTTP or from an in-memory fixture map.

/// Parsed page plus the interaction state layered over it.
pub mod document;
/// Session factories implementing the core provider port.
pub mod provider;
/// Where page bodies come from.
pub mod source;

pub use document::HtmlDocument;
pub use provider::{HttpDocumentProvider, StaticDocumentProvider};
pub use source::{FetchedPage, HttpSource, PageRequest, PageSource, StaticSource};
