//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p document-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use document_store::{
    Collection, DocumentId, DocumentStore, DocumentStoreError, Filter, PostgresDocumentStore,
    Version,
};
use serde_json::json;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresDocumentStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE documents")
        .execute(&pool)
        .await
        .unwrap();

    PostgresDocumentStore::new(pool)
}

#[tokio::test]
async fn insert_and_get_by_key() {
    let store = get_test_store().await;

    let inserted = store
        .insert(
            Collection::Products,
            10,
            json!({ "id": 10, "name": "Baguette", "price": "1.20" }),
        )
        .await
        .unwrap();
    assert_eq!(inserted.version, Version::first());

    let loaded = store
        .get_by_key(Collection::Products, 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, inserted.id);
    assert_eq!(loaded.collection, Collection::Products);
    assert_eq!(loaded.body["name"], "Baguette");
}

#[tokio::test]
async fn duplicate_key_is_reported() {
    let store = get_test_store().await;
    store
        .insert(Collection::Customers, 1, json!({ "id": 1, "name": "Ada" }))
        .await
        .unwrap();

    let result = store
        .insert(Collection::Customers, 1, json!({ "id": 1, "name": "Ada" }))
        .await;
    assert!(matches!(
        result,
        Err(DocumentStoreError::DuplicateKey { key: 1, .. })
    ));
}

#[tokio::test]
async fn equality_filter_uses_containment() {
    let store = get_test_store().await;
    for (key, customer) in [(1, 7), (2, 8), (3, 7)] {
        store
            .insert(
                Collection::Orders,
                key,
                json!({ "order_id": key, "customer_id": customer }),
            )
            .await
            .unwrap();
    }

    let found = store
        .find(Collection::Orders, &Filter::eq("customer_id", 7))
        .await
        .unwrap();
    let keys: Vec<i64> = found.iter().map(|d| d.key).collect();
    assert_eq!(keys, vec![1, 3]);

    let all = store.find(Collection::Orders, &Filter::all()).await.unwrap();
    assert_eq!(all.len(), 3);

    let first = store
        .find_one(Collection::Orders, &Filter::eq("customer_id", 8))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.key, 2);

    assert_eq!(store.count(Collection::Orders).await.unwrap(), 3);
}

#[tokio::test]
async fn replace_and_conflict() {
    let store = get_test_store().await;
    let doc = store
        .insert(Collection::Orders, 1, json!({ "order_id": 1, "lines": [] }))
        .await
        .unwrap();

    let version = store
        .replace(
            Collection::Orders,
            doc.id,
            doc.version,
            json!({ "order_id": 1, "lines": [{ "product_id": 2, "quantity": "3" }] }),
        )
        .await
        .unwrap();
    assert_eq!(version, Version::new(2));

    let stale = store
        .replace(Collection::Orders, doc.id, doc.version, json!({ "order_id": 1 }))
        .await;
    assert!(matches!(
        stale,
        Err(DocumentStoreError::ConcurrencyConflict { .. })
    ));

    let missing = store
        .replace(
            Collection::Orders,
            DocumentId::new(),
            Version::first(),
            json!({}),
        )
        .await;
    assert!(matches!(missing, Err(DocumentStoreError::NotFound(_))));
}
