//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it returns 200 whenever the process can answer HTTP and
//! never depends on configuration.

use serde::Serialize;
use tracing::instrument;

use crate::json::JsonBody;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Health check handler.
#[instrument(name = "health::health")]
pub async fn health() -> JsonBody<HealthStatus> {
    JsonBody::ok(HealthStatus { status: "healthy" })
}
