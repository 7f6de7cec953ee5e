//! Domain error types.

use document_store::DocumentStoreError;
use thiserror::Error;

use crate::customer::CustomerError;
use crate::order::OrderError;
use crate::product::ProductError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the document store.
    #[error("Document store error: {0}")]
    Store(#[from] DocumentStoreError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A customer failed validation.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// A product failed validation.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// Entity not found.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: i64 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
