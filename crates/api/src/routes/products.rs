//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use document_store::DocumentStore;
use domain::{DomainError, Product, ProductError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, parse_id};

/// Transport shape of a product.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: Some(product.description.clone()),
            price: product.price,
        }
    }
}

impl ProductDto {
    /// Converts the transport shape into a validated product.
    pub fn into_product(self) -> Result<Product, ProductError> {
        let product = Product::new(self.id, self.name, self.price)?;
        Ok(match self.description {
            Some(description) => product.with_description(description),
            None => product,
        })
    }
}

/// POST /product: add a product to the catalog.
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<ProductDto>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let product = dto.into_product().map_err(DomainError::from)?;
    let product = state.products.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(&product))))
}

/// GET /product/:id: load a product.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let id = parse_id(&id)?;
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(ProductDto::from(&product)))
}

/// GET /product/all: list the whole catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state.products.list_products().await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}
