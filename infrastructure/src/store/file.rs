//! JSON file document store

use async_trait::async_trait;
use slideforge_application::ports::document_store::{DocumentStore, StoreError};
use slideforge_domain::PresentationDocument;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores each document as `<root>/<id>.json`, pretty-printed so the
/// files stay diffable and hand-inspectable
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // Document ids are generated as run-<hex>, but ids can come from
        // callers too; keep anything that could escape the root out of
        // the filename
        let safe: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn save(&self, document: &PresentationDocument) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path_for(&document.id);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        debug!(path = %path.display(), "document saved");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<PresentationDocument>, StoreError> {
        let path = self.path_for(id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        let document = serde_json::from_str(&json)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::document;

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.save(&document("run-abc123")).await.unwrap();
        assert!(dir.path().join("run-abc123.json").exists());

        let loaded = store.load("run-abc123").await.unwrap().unwrap();
        assert_eq!(loaded.id, "run-abc123");
        assert!(store.load("run-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hostile_id_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.save(&document("../escape")).await.unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert!(store.load("../escape").await.unwrap().is_some());
    }
}
