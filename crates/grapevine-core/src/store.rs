//! Blob store abstraction.
//!
//! Game state lives in named containers of text blobs. Containers are
//! created lazily by implementations; callers never create them explicitly.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key-value storage of text blobs grouped into containers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads a blob. Returns `Ok(None)` when the blob does not exist.
    async fn read_text(&self, container: &str, name: &str) -> Result<Option<String>, DomainError>;

    /// Writes a blob, replacing any previous content.
    async fn write_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError>;

    /// Appends to a blob, creating it if missing.
    ///
    /// The default implementation reads and rewrites the blob, which is
    /// last-writer-wins under concurrent appends.
    async fn append_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError> {
        let mut content = self.read_text(container, name).await?.unwrap_or_default();
        content.push_str(text);
        self.write_text(container, name, &content).await
    }

    /// Returns the content of every blob in a container, ordered by blob name.
    async fn list_texts(&self, container: &str) -> Result<Vec<String>, DomainError>;
}
