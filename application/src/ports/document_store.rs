//! Document persistence port
//!
//! The persistence collaborator stores and retrieves presentation
//! documents by id. Schema, migrations, and access control belong to the
//! external storage system, not this core.

use async_trait::async_trait;
use slideforge_domain::PresentationDocument;
use thiserror::Error;

/// Errors from the persistence collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value persistence for presentation documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a document under its id, replacing any previous version
    async fn save(&self, document: &PresentationDocument) -> Result<(), StoreError>;

    /// Retrieve a document by id; `None` when absent
    async fn load(&self, id: &str) -> Result<Option<PresentationDocument>, StoreError>;
}
