//! Request middleware.
//!
//! `request_id_layer` generates a UUID v4 for each incoming request and creates
//! a tracing span that wraps the entire request lifecycle, so every log emitted
//! while handling the request carries the request_id field.
//!
//! `exact_path_layer` keeps route matching on the whole request target: a
//! target with a query component, or in absolute form
//! (`GET http://host/health`), is not one of the known paths.

use std::time::Instant;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
/// The ID is never sent back to the client.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Route layer that answers 404 when the request target is more than the
/// bare literal path.
pub async fn exact_path_layer(request: Request, next: Next) -> Response {
    let uri = request.uri();
    if uri.query().is_some() || uri.scheme().is_some() || uri.authority().is_some() {
        tracing::debug!(%uri, "Request target is not a literal route");
        return AppError::NotFound.into_response();
    }
    next.run(request).await
}
