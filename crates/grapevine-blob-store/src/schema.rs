//! Blob store database schema.

/// SQL to create the blobs table.
pub const CREATE_BLOBS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS grapevine_blobs (
    container   VARCHAR(255) NOT NULL,
    name        VARCHAR(255) NOT NULL,
    content     TEXT NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (container, name)
);
";
