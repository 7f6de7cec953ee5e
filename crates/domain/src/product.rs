//! Product catalog entity and service.

use document_store::{Collection, DocumentStore, Filter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DomainError;
use crate::repository::{Entity, Repository};

/// Errors raised when validating a product.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Product IDs cannot be negative.
    #[error("Invalid product id: {id} (must not be negative)")]
    InvalidId { id: i64 },

    /// Prices cannot be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Decimal },

    /// Product name is required.
    #[error("Product name is required")]
    NameRequired,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Short description.
    #[serde(default)]
    pub description: String,

    /// Unit price in EUR.
    pub price: Decimal,
}

impl Product {
    /// Creates a new product with an empty description.
    pub fn new(id: i64, name: impl Into<String>, price: Decimal) -> Result<Self, ProductError> {
        if id < 0 {
            return Err(ProductError::InvalidId { id });
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProductError::NameRequired);
        }
        if price < Decimal::ZERO {
            return Err(ProductError::InvalidPrice { price });
        }
        Ok(Self {
            id,
            name,
            description: String::new(),
            price,
        })
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Entity for Product {
    const COLLECTION: Collection = Collection::Products;
    const NAME: &'static str = "Product";

    fn key(&self) -> i64 {
        self.id
    }
}

/// Service for managing the product catalog.
pub struct ProductService<S: DocumentStore> {
    repository: Repository<S, Product>,
}

impl<S: DocumentStore> ProductService<S> {
    /// Creates a new product service with the given document store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Stores a new product.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, product: Product) -> Result<Product, DomainError> {
        Ok(self.repository.insert(product).await?.entity)
    }

    /// Loads a product by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.repository.load(id).await?.map(|l| l.entity))
    }

    /// Lists the whole catalog.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.find(&Filter::all()).await
    }
}
