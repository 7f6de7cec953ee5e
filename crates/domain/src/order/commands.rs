//! Order commands.

use chrono::{DateTime, Utc};

use super::{ProductId, Quantity};

/// Command to add a quantity of a product to an order.
#[derive(Debug, Clone)]
pub struct AddLine {
    /// The order to modify.
    pub order_id: i64,

    /// The product to add.
    pub product_id: ProductId,

    /// Quantity to add.
    pub quantity: Quantity,
}

impl AddLine {
    /// Creates a new AddLine command.
    pub fn new(order_id: i64, product_id: impl Into<ProductId>, quantity: Quantity) -> Self {
        Self {
            order_id,
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to subtract a quantity of a product from an order.
#[derive(Debug, Clone)]
pub struct SubtractLine {
    /// The order to modify.
    pub order_id: i64,

    /// The product to subtract.
    pub product_id: ProductId,

    /// Quantity to subtract.
    pub quantity: Quantity,
}

impl SubtractLine {
    /// Creates a new SubtractLine command.
    pub fn new(order_id: i64, product_id: impl Into<ProductId>, quantity: Quantity) -> Self {
        Self {
            order_id,
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to remove a product's line from an order.
#[derive(Debug, Clone)]
pub struct RemoveLine {
    /// The order to modify.
    pub order_id: i64,

    /// The product to remove.
    pub product_id: ProductId,
}

impl RemoveLine {
    /// Creates a new RemoveLine command.
    pub fn new(order_id: i64, product_id: impl Into<ProductId>) -> Self {
        Self {
            order_id,
            product_id: product_id.into(),
        }
    }
}

/// Command to mark an order as fulfilled.
#[derive(Debug, Clone)]
pub struct FulfillOrder {
    /// The order to fulfill.
    pub order_id: i64,

    /// When the order was fulfilled.
    pub fulfilled_at: DateTime<Utc>,
}

impl FulfillOrder {
    /// Creates a new FulfillOrder command.
    pub fn new(order_id: i64, fulfilled_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            fulfilled_at,
        }
    }

    /// Creates a FulfillOrder command stamped with the current time.
    pub fn now(order_id: i64) -> Self {
        Self::new(order_id, Utc::now())
    }
}
