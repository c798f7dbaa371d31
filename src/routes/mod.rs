//! HTTP route handlers.
//!
//! Two literal routes exist: `/` reports the service name and `/health` is a
//! liveness probe. Only GET is served: HEAD and every other method on those
//! paths, like every other path, answers 404 with a JSON error body.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::AppError;
use crate::middleware::{exact_path_layer, request_id_layer};
use crate::state::AppState;

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Creates the Axum router with both routes and the middleware stack.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index).head(not_found).fallback(not_found))
        .route(
            "/health",
            get(health::health).head(not_found).fallback(not_found),
        )
        .route_layer(middleware::from_fn(exact_path_layer))
        .fallback(not_found)
        .with_state(state)
        // Not one of the two standard headers; deterministic, so identical
        // requests still get identical responses
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
