//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use document_store::{Collection, DocumentStore};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub orders: Option<usize>,
}

/// GET /health: reports whether the document store answers.
pub async fn check<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.orders.repository().store().count(Collection::Orders).await {
        Ok(orders) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                orders: Some(orders),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "document store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    orders: None,
                }),
            )
        }
    }
}
