use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    Collection, Document, DocumentId, DocumentStoreError, Filter, Result, Version,
    store::DocumentStore,
};

/// In-memory document store implementation.
///
/// Keeps every document in a single insertion-ordered list and provides the
/// same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all documents.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        key: i64,
        body: serde_json::Value,
    ) -> Result<Document> {
        let mut store = self.documents.write().await;

        if store
            .iter()
            .any(|d| d.collection == collection && d.key == key)
        {
            return Err(DocumentStoreError::DuplicateKey { collection, key });
        }

        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(),
            collection,
            key,
            version: Version::first(),
            body,
            created_at: now,
            updated_at: now,
        };
        store.push(document.clone());

        metrics::counter!("documents_inserted_total", "collection" => collection.as_str())
            .increment(1);
        tracing::debug!(%collection, key, document_id = %document.id, "document inserted");

        Ok(document)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        let store = self.documents.read().await;
        Ok(store
            .iter()
            .find(|d| d.collection == collection && filter.matches(&d.body))
            .cloned())
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let store = self.documents.read().await;
        Ok(store
            .iter()
            .filter(|d| d.collection == collection && filter.matches(&d.body))
            .cloned()
            .collect())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: Version,
        body: serde_json::Value,
    ) -> Result<Version> {
        let mut store = self.documents.write().await;

        let document = store
            .iter_mut()
            .find(|d| d.collection == collection && d.id == id)
            .ok_or(DocumentStoreError::NotFound(id))?;

        if document.version != expected {
            metrics::counter!("document_conflicts_total").increment(1);
            return Err(DocumentStoreError::ConcurrencyConflict {
                document_id: id,
                expected,
                actual: document.version,
            });
        }

        document.version = document.version.next();
        document.body = body;
        document.updated_at = Utc::now();

        metrics::counter!("documents_replaced_total", "collection" => collection.as_str())
            .increment(1);

        Ok(document.version)
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        let store = self.documents.read().await;
        Ok(store.iter().filter(|d| d.collection == collection).count())
    }

    async fn get_by_key(&self, collection: Collection, key: i64) -> Result<Option<Document>> {
        let store = self.documents.read().await;
        Ok(store
            .iter()
            .find(|d| d.collection == collection && d.key == key)
            .cloned())
    }
}
