//! `PostgreSQL` implementation of the `BlobStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use grapevine_core::error::DomainError;
use grapevine_core::store::BlobStore;

use crate::schema::CREATE_BLOBS_TABLE;

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("blob store query failed: {err}"))
}

/// PostgreSQL-backed blob store. All containers share one table keyed by
/// `(container, name)`, so containers exist as soon as a blob is written.
#[derive(Debug, Clone)]
pub struct PgBlobStore {
    pool: PgPool,
}

impl PgBlobStore {
    /// Creates a new `PgBlobStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the blobs table if it does not exist yet. Safe to call on
    /// every startup.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the DDL cannot be executed.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_BLOBS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn read_text(&self, container: &str, name: &str) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT content FROM grapevine_blobs WHERE container = $1 AND name = $2",
        )
        .bind(container)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)
    }

    async fn write_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO grapevine_blobs (container, name, content, updated_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (container, name) \
             DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()",
        )
        .bind(container)
        .bind(name)
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;

        debug!(container, name, "blob written");
        Ok(())
    }

    async fn append_text(&self, container: &str, name: &str, text: &str) -> Result<(), DomainError> {
        // Single upsert, so concurrent appends never lose a line.
        sqlx::query(
            "INSERT INTO grapevine_blobs (container, name, content, updated_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (container, name) \
             DO UPDATE SET content = grapevine_blobs.content || EXCLUDED.content, updated_at = NOW()",
        )
        .bind(container)
        .bind(name)
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;

        debug!(container, name, "blob appended");
        Ok(())
    }

    async fn list_texts(&self, container: &str) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT content FROM grapevine_blobs WHERE container = $1 ORDER BY name",
        )
        .bind(container)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)
    }
}
