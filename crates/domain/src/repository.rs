//! Document-backed persistence for domain entities.

use std::marker::PhantomData;

use document_store::{Collection, DocumentId, DocumentStore, Filter, Version};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainError;

/// An entity that is stored as one document.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the entity is stored in.
    const COLLECTION: Collection;

    /// Human-readable entity name, used in errors.
    const NAME: &'static str;

    /// Returns the business key.
    fn key(&self) -> i64;
}

/// An entity together with the storage identity and version it was loaded at.
#[derive(Debug, Clone)]
pub struct Loaded<E> {
    /// The entity.
    pub entity: E,

    /// Storage identity of the backing document.
    pub document_id: DocumentId,

    /// Version the entity was loaded at.
    pub version: Version,
}

/// Repository for loading and saving entities of one type.
///
/// Saves are guarded by the version the entity was loaded at, so two writers
/// racing on the same document cannot both succeed.
pub struct Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<E>,
}

impl<S, E> Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts a new entity.
    pub async fn insert(&self, entity: E) -> Result<Loaded<E>, DomainError> {
        let body = serde_json::to_value(&entity)?;
        let document = self.store.insert(E::COLLECTION, entity.key(), body).await?;

        Ok(Loaded {
            entity,
            document_id: document.id,
            version: document.version,
        })
    }

    /// Loads an entity by its business key.
    pub async fn load(&self, key: i64) -> Result<Option<Loaded<E>>, DomainError> {
        let Some(document) = self.store.get_by_key(E::COLLECTION, key).await? else {
            return Ok(None);
        };

        Ok(Some(Loaded {
            entity: document.decode()?,
            document_id: document.id,
            version: document.version,
        }))
    }

    /// Loads an entity, failing with `NotFound` if it doesn't exist.
    pub async fn load_existing(&self, key: i64) -> Result<Loaded<E>, DomainError> {
        self.load(key).await?.ok_or(DomainError::NotFound {
            entity: E::NAME,
            key,
        })
    }

    /// Returns every entity matching the filter.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<E>, DomainError> {
        let documents = self.store.find(E::COLLECTION, filter).await?;
        documents
            .iter()
            .map(|d| d.decode().map_err(DomainError::from))
            .collect()
    }

    /// Saves a loaded entity back, guarded by its loaded version.
    pub async fn save(&self, loaded: &Loaded<E>) -> Result<Version, DomainError> {
        let body = serde_json::to_value(&loaded.entity)?;
        let version = self
            .store
            .replace(E::COLLECTION, loaded.document_id, loaded.version, body)
            .await?;
        Ok(version)
    }

    /// Loads an entity, applies `change` to it and saves the result.
    ///
    /// Nothing is written if `change` fails.
    pub async fn execute<F, Er>(&self, key: i64, change: F) -> Result<E, DomainError>
    where
        F: FnOnce(&mut E) -> Result<(), Er>,
        DomainError: From<Er>,
    {
        let mut loaded = self.load_existing(key).await?;
        change(&mut loaded.entity)?;

        let version = self.save(&loaded).await?;
        tracing::debug!(entity = E::NAME, key, %version, "entity saved");

        Ok(loaded.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document_store::{DocumentStoreError, InMemoryDocumentStore};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tray {
        id: i64,
        loaves: u32,
    }

    impl Entity for Tray {
        const COLLECTION: Collection = Collection::Products;
        const NAME: &'static str = "Tray";

        fn key(&self) -> i64 {
            self.id
        }
    }

    fn repository() -> Repository<InMemoryDocumentStore, Tray> {
        Repository::new(InMemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn test_insert_and_load() {
        let repo = repository();
        repo.insert(Tray { id: 1, loaves: 6 }).await.unwrap();

        let loaded = repo.load(1).await.unwrap().unwrap();
        assert_eq!(loaded.entity, Tray { id: 1, loaves: 6 });
        assert_eq!(loaded.version, Version::first());

        assert!(repo.load(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_existing_reports_not_found() {
        let repo = repository();
        let result = repo.load_existing(5).await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: "Tray",
                key: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_execute_persists_change() {
        let repo = repository();
        repo.insert(Tray { id: 1, loaves: 6 }).await.unwrap();

        let tray = repo
            .execute(1, |t: &mut Tray| {
                t.loaves += 2;
                Ok::<_, DomainError>(())
            })
            .await
            .unwrap();
        assert_eq!(tray.loaves, 8);

        let loaded = repo.load(1).await.unwrap().unwrap();
        assert_eq!(loaded.entity.loaves, 8);
        assert_eq!(loaded.version, Version::new(2));
    }

    #[tokio::test]
    async fn test_failed_change_writes_nothing() {
        let repo = repository();
        repo.insert(Tray { id: 1, loaves: 6 }).await.unwrap();

        let result = repo
            .execute(1, |t: &mut Tray| {
                t.loaves = 0;
                Err(DomainError::NotFound {
                    entity: "Loaf",
                    key: 0,
                })
            })
            .await;
        assert!(result.is_err());

        let loaded = repo.load(1).await.unwrap().unwrap();
        assert_eq!(loaded.entity.loaves, 6);
        assert_eq!(loaded.version, Version::first());
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let repo = repository();
        repo.insert(Tray { id: 1, loaves: 6 }).await.unwrap();

        let mut first = repo.load(1).await.unwrap().unwrap();
        let mut second = repo.load(1).await.unwrap().unwrap();

        first.entity.loaves = 7;
        repo.save(&first).await.unwrap();

        second.entity.loaves = 9;
        let result = repo.save(&second).await;
        assert!(matches!(
            result,
            Err(DomainError::Store(DocumentStoreError::ConcurrencyConflict { .. }))
        ));
    }
}
