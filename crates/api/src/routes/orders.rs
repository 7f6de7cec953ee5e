//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use document_store::DocumentStore;
use domain::{AddLine, FulfillOrder, LineEntry, Order, OrderError, RemoveLine, SubtractLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, parse_id};

// -- Transport shapes --

/// Transport shape of an order.
///
/// `product_quantities` is nullable; an order posted without it is stored
/// with an absent line collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: i64,
    pub customer_id: i64,
    pub placed: DateTime<Utc>,
    #[serde(default)]
    pub fulfilled: Option<DateTime<Utc>>,
    #[serde(default)]
    pub product_quantities: Option<Vec<LineEntryDto>>,
    /// Sum of all line quantities; null when the lines are absent.
    #[serde(default, skip_deserializing)]
    pub total_quantity: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineEntryDto {
    pub product_id: i64,
    pub quantity: Decimal,
}

impl TryFrom<&Order> for OrderDto {
    type Error = OrderError;

    /// Fails only when the stored line quantities cannot be totalled.
    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        let total_quantity = match order.total_quantity() {
            Ok(total) => Some(total),
            Err(OrderError::LinesAbsent) => None,
            Err(err) => return Err(err),
        };

        Ok(Self {
            id: order.order_id(),
            customer_id: order.customer_id(),
            placed: order.placed_at(),
            fulfilled: order.fulfilled_at(),
            product_quantities: order.lines().map(|lines| {
                lines
                    .iter()
                    .map(|l| LineEntryDto {
                        product_id: l.product_id.as_i64(),
                        quantity: l.quantity,
                    })
                    .collect()
            }),
            total_quantity,
        })
    }
}

impl OrderDto {
    /// Converts the transport shape into an order aggregate.
    pub fn into_order(self) -> Order {
        let lines = self.product_quantities.map(|lines| {
            lines
                .into_iter()
                .map(|l| LineEntry::new(l.product_id, l.quantity))
                .collect()
        });
        Order::restore(self.id, self.placed, self.customer_id, self.fulfilled, lines)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: i64,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SubtractLineRequest {
    pub quantity: Decimal,
}

// -- Handlers --

/// POST /order: store a new order.
#[tracing::instrument(skip(state, dto), fields(order_id = dto.id))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<OrderDto>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    let order = state.orders.create_order(dto.into_order()).await?;
    Ok((StatusCode::CREATED, Json(OrderDto::try_from(&order)?)))
}

/// GET /order/:id: load an order.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(OrderDto::try_from(&order)?))
}

/// GET /order/all: list every order.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let orders = state.orders.list_orders().await?;
    let orders = orders
        .iter()
        .map(OrderDto::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(orders))
}

/// GET /customer/:id/orders: list the orders of one customer.
#[tracing::instrument(skip(state))]
pub async fn list_for_customer<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let id = parse_id(&id)?;
    let orders = state.orders.list_customer_orders(id).await?;
    let orders = orders
        .iter()
        .map(OrderDto::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(orders))
}

/// POST /order/:id/lines: add a quantity of a product.
#[tracing::instrument(skip(state))]
pub async fn add_line<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<AddLineRequest>,
) -> Result<Json<OrderDto>, ApiError> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .add_line(AddLine::new(id, req.product_id, req.quantity))
        .await?;
    Ok(Json(OrderDto::try_from(&order)?))
}

/// POST /order/:id/lines/:product_id/subtract: subtract a quantity of a product.
#[tracing::instrument(skip(state))]
pub async fn subtract_line<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, product_id)): Path<(String, String)>,
    Json(req): Json<SubtractLineRequest>,
) -> Result<Json<OrderDto>, ApiError> {
    let id = parse_id(&id)?;
    let product_id = parse_id(&product_id)?;
    let order = state
        .orders
        .subtract_line(SubtractLine::new(id, product_id, req.quantity))
        .await?;
    Ok(Json(OrderDto::try_from(&order)?))
}

/// DELETE /order/:id/lines/:product_id: remove a product's line.
#[tracing::instrument(skip(state))]
pub async fn remove_line<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<Json<OrderDto>, ApiError> {
    let id = parse_id(&id)?;
    let product_id = parse_id(&product_id)?;
    let order = state
        .orders
        .remove_line(RemoveLine::new(id, product_id))
        .await?;
    Ok(Json(OrderDto::try_from(&order)?))
}

/// POST /order/:id/fulfill: mark an order as fulfilled now.
#[tracing::instrument(skip(state))]
pub async fn fulfill<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError> {
    let id = parse_id(&id)?;
    let order = state.orders.fulfill_order(FulfillOrder::now(id)).await?;
    Ok(Json(OrderDto::try_from(&order)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_keeps_absent_lines() {
        let dto: OrderDto = serde_json::from_value(serde_json::json!({
            "id": 1,
            "customer_id": 2,
            "placed": "2024-03-01T08:00:00Z"
        }))
        .unwrap();

        let order = dto.into_order();
        assert!(order.lines().is_none());

        let back = OrderDto::try_from(&order).unwrap();
        assert!(back.product_quantities.is_none());
        assert!(back.total_quantity.is_none());
    }

    #[test]
    fn test_mapping_clamps_customer_and_totals_lines() {
        let dto: OrderDto = serde_json::from_value(serde_json::json!({
            "id": 1,
            "customer_id": -3,
            "placed": "2024-03-01T08:00:00Z",
            "product_quantities": [
                { "product_id": 101, "quantity": 3 },
                { "product_id": 102, "quantity": "1.5" }
            ]
        }))
        .unwrap();

        let back = OrderDto::try_from(&dto.into_order()).unwrap();
        assert_eq!(back.customer_id, 0);
        assert_eq!(back.product_quantities.unwrap().len(), 2);
        assert_eq!(back.total_quantity, Some(Decimal::new(45, 1)));
    }

    #[test]
    fn test_total_quantity_is_ignored_on_input() {
        let dto: OrderDto = serde_json::from_value(serde_json::json!({
            "id": 1,
            "customer_id": 2,
            "placed": "2024-03-01T08:00:00Z",
            "product_quantities": [],
            "total_quantity": "99"
        }))
        .unwrap();
        assert!(dto.total_quantity.is_none());
    }
}
