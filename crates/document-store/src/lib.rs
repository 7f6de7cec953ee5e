//! Persistence boundary for the bakery ordering backend.
//!
//! Entities are stored as JSON documents grouped into collections. Each
//! document carries a storage identity assigned at insert time, the business
//! key of the entity it holds, and a version used for optimistic concurrency.

pub mod document;
pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::DocumentId;
pub use document::{Collection, Document, Version};
pub use error::{DocumentStoreError, Result};
pub use filter::Filter;
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::DocumentStore;
