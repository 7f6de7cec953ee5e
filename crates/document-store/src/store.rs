use async_trait::async_trait;

use crate::{Collection, Document, DocumentId, Filter, Result, Version};

/// Core trait for document store implementations.
///
/// All implementations must be thread-safe (Send + Sync). Documents are
/// returned in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and assigns its storage identity.
    ///
    /// Fails with `DuplicateKey` if the collection already holds a document
    /// with the same business key.
    async fn insert(
        &self,
        collection: Collection,
        key: i64,
        body: serde_json::Value,
    ) -> Result<Document>;

    /// Returns the first document matching the filter.
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>>;

    /// Returns all documents matching the filter.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>>;

    /// Replaces the body of an existing document.
    ///
    /// Fails with `ConcurrencyConflict` if the stored version differs from
    /// `expected`. Returns the new version.
    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: Version,
        body: serde_json::Value,
    ) -> Result<Version>;

    /// Returns the number of documents in a collection.
    async fn count(&self, collection: Collection) -> Result<usize>;

    /// Looks up a document by its business key.
    async fn get_by_key(&self, collection: Collection, key: i64) -> Result<Option<Document>>;
}
