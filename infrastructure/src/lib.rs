//! Infrastructure layer for slideforge
//!
//! Adapters for the application layer's ports: the HTTP model provider
//! (with optional fallback), configuration loading, document stores, and
//! dataset ingestion.

pub mod config;
pub mod ingest;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileProviderConfig};
pub use ingest::dataset_from_json;
pub use providers::{FallbackGateway, HttpChatGateway};
pub use store::{InMemoryDocumentStore, JsonFileStore};
