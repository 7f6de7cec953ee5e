//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use document_store::DocumentStore;
use domain::{Customer, CustomerError};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, parse_id};

/// Transport shape of a customer.
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: i64,
    pub name: String,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
        }
    }
}

impl CustomerDto {
    /// Converts the transport shape into a validated customer.
    pub fn into_customer(self) -> Result<Customer, CustomerError> {
        Customer::new(self.id, self.name)
    }
}

/// POST /customer: register a customer.
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<CustomerDto>,
) -> Result<(StatusCode, Json<CustomerDto>), ApiError> {
    let customer = dto.into_customer().map_err(domain::DomainError::from)?;
    let customer = state.customers.create_customer(customer).await?;
    Ok((StatusCode::CREATED, Json(CustomerDto::from(&customer))))
}

/// GET /customer/:id: load a customer.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerDto>, ApiError> {
    let id = parse_id(&id)?;
    let customer = state
        .customers
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;
    Ok(Json(CustomerDto::from(&customer)))
}

/// GET /customer/all: list every customer.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let customers = state.customers.list_customers().await?;
    Ok(Json(customers.iter().map(CustomerDto::from).collect()))
}
