//! Root status endpoint.

use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use crate::json::JsonBody;
use crate::state::AppState;

/// Body of `GET /`. Field order is part of the wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub service: String,
    pub ok: bool,
}

/// Reports the configured service name.
#[instrument(name = "home::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> JsonBody<ServiceStatus> {
    JsonBody::ok(ServiceStatus {
        service: state.config.service.name.clone(),
        ok: true,
    })
}
