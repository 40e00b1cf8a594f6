//! Core types and service wiring for the binday collection schedule extractor.

/// Parsing of council date text into calendar dates.
pub mod date;
/// Abstraction over a loaded, navigable page.
pub mod document;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Registry and helpers for plugging council-specific providers into the service.
pub mod plugin;
/// Traits describing the provider interfaces and their error type.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Scoped acquisition and release of document sessions.
pub mod session;

pub use date::*;
pub use document::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
pub use session::*;
