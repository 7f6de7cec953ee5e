//! Order aggregate and related types.

mod aggregate;
mod commands;
mod service;
mod value_objects;

pub use aggregate::Order;
pub use commands::*;
pub use service::OrderService;
pub use value_objects::{LineEntry, ProductId, Quantity};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Quantity must be greater than zero.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: Quantity },

    /// No line exists for the product.
    #[error("No line for product {product_id}")]
    LineNotFound { product_id: ProductId },

    /// More than one line exists for the product.
    #[error("Multiple lines for product {product_id}")]
    AmbiguousLine { product_id: ProductId },

    /// Applying the quantity would leave the representable range.
    #[error("Quantity for product {product_id} is out of range")]
    QuantityOverflow { product_id: ProductId },

    /// The line quantities sum past the representable range.
    #[error("Order total quantity is out of range at product {product_id}")]
    TotalOverflow { product_id: ProductId },

    /// The order's line collection is missing.
    #[error("Order lines are absent")]
    LinesAbsent,
}
