use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Collection, Document, DocumentId, DocumentStoreError, Filter, Result, Version,
    store::DocumentStore,
};

const SELECT_COLUMNS: &str = "id, collection, key, version, body, created_at, updated_at";

/// PostgreSQL-backed document store implementation.
///
/// Bodies live in a JSONB column; equality filters are evaluated with JSONB
/// containment so they can use the GIN index on `body`.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        let collection: String = row.try_get("collection")?;
        let collection = serde_json::from_value(serde_json::Value::String(collection))?;

        Ok(Document {
            id: DocumentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            collection,
            key: row.try_get("key")?,
            version: Version::new(row.try_get("version")?),
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        key: i64,
        body: serde_json::Value,
    ) -> Result<Document> {
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

        sqlx::query(
            r#"
            INSERT INTO documents (id, collection, key, version, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(collection.as_str())
        .bind(key)
        .bind(document.version.as_i64())
        .bind(&document.body)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("unique_collection_key")
            {
                return DocumentStoreError::DuplicateKey { collection, key };
            }
            DocumentStoreError::Database(e)
        })?;

        metrics::counter!("documents_inserted_total", "collection" => collection.as_str())
            .increment(1);
        tracing::debug!(%collection, key, document_id = %document.id, "document inserted");

        Ok(document)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE collection = $1 AND body @> $2 ORDER BY seq ASC LIMIT 1"
        ))
        .bind(collection.as_str())
        .bind(filter.to_json())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE collection = $1 AND body @> $2 ORDER BY seq ASC"
        ))
        .bind(collection.as_str())
        .bind(filter.to_json())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: Version,
        body: serde_json::Value,
    ) -> Result<Version> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET body = $1, version = version + 1, updated_at = $2
            WHERE id = $3 AND collection = $4 AND version = $5
            RETURNING version
            "#,
        )
        .bind(&body)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(collection.as_str())
        .bind(expected.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(version) = updated {
            metrics::counter!("documents_replaced_total", "collection" => collection.as_str())
                .increment(1);
            return Ok(Version::new(version));
        }

        let actual: Option<i64> =
            sqlx::query_scalar("SELECT version FROM documents WHERE id = $1 AND collection = $2")
                .bind(id.as_uuid())
                .bind(collection.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match actual {
            Some(actual) => {
                metrics::counter!("document_conflicts_total").increment(1);
                Err(DocumentStoreError::ConcurrencyConflict {
                    document_id: id,
                    expected,
                    actual: Version::new(actual),
                })
            }
            None => Err(DocumentStoreError::NotFound(id)),
        }
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        let count = usize::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(count)
    }

    async fn get_by_key(&self, collection: Collection, key: i64) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE collection = $1 AND key = $2"
        ))
        .bind(collection.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }
}
