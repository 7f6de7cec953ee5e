use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// A named group of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Customers,
    Products,
    Orders,
}

impl Collection {
    /// Returns the stable storage name of the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Customers => "customers",
            Collection::Products => "products",
            Collection::Orders => "orders",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Version number of a stored document, used for optimistic concurrency control.
///
/// A freshly inserted document is at version 1; every replace increments it by 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version of a freshly inserted document.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A stored document with its storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Storage identity, assigned on insert.
    pub id: DocumentId,

    /// The collection this document belongs to.
    pub collection: Collection,

    /// Business key of the stored entity (customer, product or order ID).
    pub key: i64,

    /// Current version of the document.
    pub version: Version,

    /// The entity itself.
    pub body: serde_json::Value,

    /// When the document was inserted.
    pub created_at: DateTime<Utc>,

    /// When the document was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Deserializes the document body into an entity.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}
