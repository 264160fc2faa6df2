//! Grapevine blob storage backends.
//!
//! `InMemoryBlobStore` serves development and tests; `PgBlobStore` keeps
//! game state durable across restarts.

pub mod memory_blob_store;
pub mod pg_blob_store;
pub mod schema;
