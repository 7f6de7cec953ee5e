//! Value objects for the order domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity of a product on an order line.
///
/// Fractional quantities are allowed for goods sold by weight.
pub type Quantity = Decimal;

/// Catalog key of a product.
///
/// The order aggregate treats it as an opaque key and never checks it
/// against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Creates a product ID from its raw value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// One product and the quantity ordered of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    /// The ordered product.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: Quantity,
}

impl LineEntry {
    /// Creates a new line entry.
    pub fn new(product_id: impl Into<ProductId>, quantity: Quantity) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}
