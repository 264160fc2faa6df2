//! Test blob stores: mock `BlobStore` implementations for tests.

use async_trait::async_trait;
use grapevine_core::error::DomainError;
use grapevine_core::store::BlobStore;

/// A blob store that always returns an infrastructure error. Useful for
/// testing the degrade-and-log paths.
#[derive(Debug)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn read_text(&self, _container: &str, _name: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn write_text(&self, _container: &str, _name: &str, _text: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_texts(&self, _container: &str) -> Result<Vec<String>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
