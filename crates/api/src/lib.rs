//! HTTP API server with observability for the bakery ordering backend.
//!
//! Provides REST endpoints for customers, products and orders, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use document_store::DocumentStore;
use domain::{CustomerService, OrderService, ProductService};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub customers: CustomerService<S>,
    pub products: ProductService<S>,
    pub orders: OrderService<S>,
}

/// Creates the application state with every service sharing one store.
pub fn create_state<S: DocumentStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        customers: CustomerService::new(store.clone()),
        products: ProductService::new(store.clone()),
        orders: OrderService::new(store),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/customer", post(routes::customers::create::<S>))
        .route("/customer/all", get(routes::customers::list::<S>))
        .route("/customer/{id}", get(routes::customers::get::<S>))
        .route("/customer/{id}/orders", get(routes::orders::list_for_customer::<S>))
        .route("/product", post(routes::products::create::<S>))
        .route("/product/all", get(routes::products::list::<S>))
        .route("/product/{id}", get(routes::products::get::<S>))
        .route("/order", post(routes::orders::create::<S>))
        .route("/order/all", get(routes::orders::list::<S>))
        .route("/order/{id}", get(routes::orders::get::<S>))
        .route("/order/{id}/lines", post(routes::orders::add_line::<S>))
        .route(
            "/order/{id}/lines/{product_id}",
            axum::routing::delete(routes::orders::remove_line::<S>),
        )
        .route(
            "/order/{id}/lines/{product_id}/subtract",
            post(routes::orders::subtract_line::<S>),
        )
        .route("/order/{id}/fulfill", post(routes::orders::fulfill::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
