//! Router construction for the catalog server.

use std::time::Duration;

use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::request_id;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let v1 = Router::new()
        .route("/product", post(handlers::product::create_product))
        .route("/product/:id", get(handlers::product::get_product))
        .route("/products", get(handlers::product::list_products))
        .route("/discount", post(handlers::discount::create_discount))
        .route("/discounts", get(handlers::discount::get_discounts));

    Router::new()
        .route("/ping", get(handlers::health::ping))
        .nest("/v1", v1)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        // Outermost: every response, timeouts included, gets the id.
        .layer(axum_mw::from_fn(request_id))
        .with_state(state)
}
