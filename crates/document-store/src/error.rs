use thiserror::Error;

use crate::{Collection, DocumentId, Version};

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// A document with the same business key already exists in the collection.
    #[error("Duplicate key {key} in collection {collection}")]
    DuplicateKey { collection: Collection, key: i64 },

    /// The document was not found.
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// The document was modified since it was loaded.
    #[error(
        "Concurrency conflict for document {document_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        document_id: DocumentId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, DocumentStoreError>;
