//! Customer entity and service.

use document_store::{Collection, DocumentStore, Filter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DomainError;
use crate::repository::{Entity, Repository};

/// Errors raised when validating a customer.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Customer name is required.
    #[error("Customer name is required")]
    NameRequired,
}

/// A bakery customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: i64,

    /// Customer name.
    pub name: String,
}

impl Customer {
    /// Creates a new customer.
    pub fn new(id: i64, name: impl Into<String>) -> Result<Self, CustomerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CustomerError::NameRequired);
        }
        Ok(Self { id, name })
    }
}

impl Entity for Customer {
    const COLLECTION: Collection = Collection::Customers;
    const NAME: &'static str = "Customer";

    fn key(&self) -> i64 {
        self.id
    }
}

/// Service for managing customers.
pub struct CustomerService<S: DocumentStore> {
    repository: Repository<S, Customer>,
}

impl<S: DocumentStore> CustomerService<S> {
    /// Creates a new customer service with the given document store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Stores a new customer.
    #[tracing::instrument(skip(self))]
    pub async fn create_customer(&self, customer: Customer) -> Result<Customer, DomainError> {
        Ok(self.repository.insert(customer).await?.entity)
    }

    /// Loads a customer by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, id: i64) -> Result<Option<Customer>, DomainError> {
        Ok(self.repository.load(id).await?.map(|l| l.entity))
    }

    /// Lists every customer.
    #[tracing::instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, DomainError> {
        self.repository.find(&Filter::all()).await
    }
}
