//! In-memory implementation of the `BlobStore` trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use grapevine_core::error::DomainError;
use grapevine_core::store::BlobStore;

/// Blob store held entirely in process memory. Content is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    containers: RwLock<BTreeMap<String, BTreeMap<String, String>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn read_text(&self, container: &str, name: &str) -> Result<Option<String>, DomainError> {
        let containers = self.containers.read().await;
        Ok(containers
            .get(container)
            .and_then(|blobs| blobs.get(name))
            .cloned())
    }

    async fn write_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError> {
        self.containers
            .write()
            .await
            .entry(container.to_owned())
            .or_default()
            .insert(name.to_owned(), text.to_owned());
        Ok(())
    }

    async fn append_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError> {
        self.containers
            .write()
            .await
            .entry(container.to_owned())
            .or_default()
            .entry(name.to_owned())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn list_texts(&self, container: &str) -> Result<Vec<String>, DomainError> {
        let containers = self.containers.read().await;
        Ok(containers
            .get(container)
            .map(|blobs| blobs.values().cloned().collect())
            .unwrap_or_default())
    }
}
