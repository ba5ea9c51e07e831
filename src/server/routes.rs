//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{middleware, routing::{get, post}, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{checkout, health};
use crate::middleware::logging::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    Router::new()
        .route("/checkout", post(checkout::create_checkout))
        .merge(health_routes)
        // Apply middleware layers (order matters: last added = outermost = runs first)
        .layer(create_cors_layer())
        // Custom request logging with trace IDs
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create CORS layer with permissive settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            axum::http::HeaderName::from_static(TRACE_ID_HEADER),
            axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
