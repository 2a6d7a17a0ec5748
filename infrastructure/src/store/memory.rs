//! In-memory document store

use async_trait::async_trait;
use slideforge_application::ports::document_store::{DocumentStore, StoreError};
use slideforge_domain::PresentationDocument;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Keeps documents in a map for the process lifetime
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, PresentationDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, document: &PresentationDocument) -> Result<(), StoreError> {
        self.documents
            .lock()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<PresentationDocument>, StoreError> {
        Ok(self.documents.lock().await.get(id).cloned())
    }
}
