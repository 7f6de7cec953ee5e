//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LineEntry, OrderError, ProductId, Quantity};

/// Order aggregate root.
///
/// Owns the line entries of a single order and enforces the quantity rules
/// for adding, subtracting and removing products.
///
/// `lines` is `None` when the order was hydrated from a document whose line
/// list was null. Such an order is malformed: mutations report `Ok(false)`
/// and [`Order::total_quantity`] fails instead of returning zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderSnapshot")]
pub struct Order {
    /// Order identifier, assigned by the caller.
    order_id: i64,

    /// Customer who placed the order. Never negative.
    customer_id: i64,

    /// When the order was placed.
    placed_at: DateTime<Utc>,

    /// When the order was fulfilled, if it has been.
    fulfilled_at: Option<DateTime<Utc>>,

    /// Ordered lines in insertion order.
    lines: Option<Vec<LineEntry>>,
}

/// Persisted shape of an order, routed through [`Order::restore`] on load.
#[derive(Deserialize)]
struct OrderSnapshot {
    order_id: i64,
    customer_id: i64,
    placed_at: DateTime<Utc>,
    #[serde(default)]
    fulfilled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    lines: Option<Vec<LineEntry>>,
}

impl From<OrderSnapshot> for Order {
    fn from(s: OrderSnapshot) -> Self {
        Order::restore(s.order_id, s.placed_at, s.customer_id, s.fulfilled_at, s.lines)
    }
}

// Construction
impl Order {
    /// Creates an order from its parts.
    ///
    /// A negative `customer_id` is clamped to zero. Lines are copied verbatim
    /// without going through [`Order::add`], so duplicate products are kept as
    /// given. `None` yields an empty order.
    pub fn new(
        order_id: i64,
        placed_at: DateTime<Utc>,
        customer_id: i64,
        lines: Option<Vec<LineEntry>>,
    ) -> Self {
        Self::restore(
            order_id,
            placed_at,
            customer_id,
            None,
            Some(lines.unwrap_or_default()),
        )
    }

    /// Creates an empty order placed now.
    pub fn empty(order_id: i64, customer_id: i64) -> Self {
        Self::new(order_id, Utc::now(), customer_id, None)
    }

    /// Rebuilds an order from a stored or transported snapshot.
    ///
    /// Unlike [`Order::new`], an absent line list stays absent.
    pub fn restore(
        order_id: i64,
        placed_at: DateTime<Utc>,
        customer_id: i64,
        fulfilled_at: Option<DateTime<Utc>>,
        lines: Option<Vec<LineEntry>>,
    ) -> Self {
        Self {
            order_id,
            customer_id: customer_id.max(0),
            placed_at,
            fulfilled_at,
            lines,
        }
    }
}

// Query methods
impl Order {
    /// Returns the order ID.
    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    /// Returns the customer ID.
    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    /// Returns when the order was placed.
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Returns when the order was fulfilled.
    pub fn fulfilled_at(&self) -> Option<DateTime<Utc>> {
        self.fulfilled_at
    }

    /// Returns true once the order has been fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled_at.is_some()
    }

    /// Returns the lines, or `None` if the line collection is absent.
    pub fn lines(&self) -> Option<&[LineEntry]> {
        self.lines.as_deref()
    }

    /// Returns the first line for a product.
    pub fn line(&self, product_id: ProductId) -> Option<&LineEntry> {
        self.lines
            .as_ref()?
            .iter()
            .find(|l| l.product_id == product_id)
    }

    /// Returns the number of lines (zero if absent).
    pub fn line_count(&self) -> usize {
        self.lines.as_ref().map_or(0, Vec::len)
    }

    /// Returns the sum of all line quantities.
    ///
    /// Fails with `TotalOverflow` if the sum leaves the `Decimal` range.
    pub fn total_quantity(&self) -> Result<Quantity, OrderError> {
        let lines = self.lines.as_ref().ok_or(OrderError::LinesAbsent)?;
        lines.iter().try_fold(Decimal::ZERO, |total, l| {
            total
                .checked_add(l.quantity)
                .ok_or(OrderError::TotalOverflow {
                    product_id: l.product_id,
                })
        })
    }
}

// Line operations
impl Order {
    /// Adds a quantity of a product.
    ///
    /// Merges into the existing line for the product, or appends a new one.
    /// A merge that leaves the `Decimal` range fails and changes nothing.
    /// Returns `Ok(false)` if the line collection is absent.
    pub fn add(&mut self, product_id: ProductId, quantity: Quantity) -> Result<bool, OrderError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(false);
        };
        ensure_positive(quantity)?;

        match lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(OrderError::QuantityOverflow { product_id })?;
            }
            None => lines.push(LineEntry::new(product_id, quantity)),
        }
        Ok(true)
    }

    /// Subtracts a quantity of a product.
    ///
    /// Requires exactly one line for the product. The result is not floored:
    /// a line can reach zero or go negative and is kept either way.
    /// Returns `Ok(false)` if the line collection is absent.
    pub fn subtract(
        &mut self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<bool, OrderError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(false);
        };
        ensure_positive(quantity)?;

        let mut matching = lines.iter_mut().filter(|l| l.product_id == product_id);
        let line = matching
            .next()
            .ok_or(OrderError::LineNotFound { product_id })?;
        if matching.next().is_some() {
            return Err(OrderError::AmbiguousLine { product_id });
        }

        line.quantity = line
            .quantity
            .checked_sub(quantity)
            .ok_or(OrderError::QuantityOverflow { product_id })?;
        Ok(true)
    }

    /// Removes the line for a product.
    ///
    /// Returns `Ok(false)` if the line collection is absent.
    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, OrderError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(false);
        };

        let position = lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(OrderError::LineNotFound { product_id })?;
        lines.remove(position);
        Ok(true)
    }

    /// Sets or clears the fulfillment timestamp.
    pub fn set_fulfilled_at(&mut self, fulfilled_at: Option<DateTime<Utc>>) {
        self.fulfilled_at = fulfilled_at;
    }
}

fn ensure_positive(quantity: Quantity) -> Result<(), OrderError> {
    if quantity <= Decimal::ZERO {
        return Err(OrderError::InvalidQuantity { quantity });
    }
    Ok(())
}
