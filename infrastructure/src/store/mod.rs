//! Document store adapters
//!
//! [`InMemoryDocumentStore`] backs tests and embedded use;
//! [`JsonFileStore`] writes one pretty-printed JSON file per document.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
