//! Order service: loads an order, applies one aggregate operation and saves it.

use document_store::{Collection, DocumentStore, Filter};

use crate::error::DomainError;
use crate::repository::{Entity, Repository};

use super::{AddLine, FulfillOrder, Order, OrderError, RemoveLine, SubtractLine};

impl Entity for Order {
    const COLLECTION: Collection = Collection::Orders;
    const NAME: &'static str = "Order";

    fn key(&self) -> i64 {
        self.order_id()
    }
}

/// Maps the aggregate's `Ok(false)` onto an error the caller can act on.
fn applied(applied: bool) -> Result<(), OrderError> {
    if applied {
        Ok(())
    } else {
        Err(OrderError::LinesAbsent)
    }
}

/// Service for managing orders.
pub struct OrderService<S: DocumentStore> {
    repository: Repository<S, Order>,
}

impl<S: DocumentStore> OrderService<S> {
    /// Creates a new order service with the given document store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Order> {
        &self.repository
    }

    /// Stores a new order.
    ///
    /// An order whose lines cannot be totalled is rejected before it is stored.
    #[tracing::instrument(skip(self, order), fields(order_id = order.order_id()))]
    pub async fn create_order(&self, order: Order) -> Result<Order, DomainError> {
        if let Err(OrderError::TotalOverflow { product_id }) = order.total_quantity() {
            return Err(OrderError::QuantityOverflow { product_id }.into());
        }

        let loaded = self.repository.insert(order).await?;
        metrics::counter!("orders_created_total").increment(1);
        Ok(loaded.entity)
    }

    /// Loads an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: i64) -> Result<Option<Order>, DomainError> {
        Ok(self.repository.load(order_id).await?.map(|l| l.entity))
    }

    /// Lists every order.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.repository.find(&Filter::all()).await
    }

    /// Lists the orders placed by one customer.
    #[tracing::instrument(skip(self))]
    pub async fn list_customer_orders(&self, customer_id: i64) -> Result<Vec<Order>, DomainError> {
        self.repository
            .find(&Filter::eq("customer_id", customer_id))
            .await
    }

    /// Adds a quantity of a product to an order.
    #[tracing::instrument(skip(self))]
    pub async fn add_line(&self, cmd: AddLine) -> Result<Order, DomainError> {
        let order = self
            .repository
            .execute(cmd.order_id, |order| {
                order.add(cmd.product_id, cmd.quantity).and_then(applied)
            })
            .await?;
        metrics::counter!("order_lines_added_total").increment(1);
        Ok(order)
    }

    /// Subtracts a quantity of a product from an order.
    #[tracing::instrument(skip(self))]
    pub async fn subtract_line(&self, cmd: SubtractLine) -> Result<Order, DomainError> {
        let order = self
            .repository
            .execute(cmd.order_id, |order| {
                order
                    .subtract(cmd.product_id, cmd.quantity)
                    .and_then(applied)
            })
            .await?;
        metrics::counter!("order_lines_subtracted_total").increment(1);
        Ok(order)
    }

    /// Removes a product's line from an order.
    #[tracing::instrument(skip(self))]
    pub async fn remove_line(&self, cmd: RemoveLine) -> Result<Order, DomainError> {
        let order = self
            .repository
            .execute(cmd.order_id, |order| {
                order.remove(cmd.product_id).and_then(applied)
            })
            .await?;
        metrics::counter!("order_lines_removed_total").increment(1);
        Ok(order)
    }

    /// Marks an order as fulfilled.
    #[tracing::instrument(skip(self))]
    pub async fn fulfill_order(&self, cmd: FulfillOrder) -> Result<Order, DomainError> {
        let order = self
            .repository
            .execute(cmd.order_id, |order| {
                order.set_fulfilled_at(Some(cmd.fulfilled_at));
                Ok::<_, OrderError>(())
            })
            .await?;
        tracing::info!(order_id = cmd.order_id, "order fulfilled");
        Ok(order)
    }
}
