//! statusd: a tiny HTTP service answering a status and a health endpoint.
//!
//! `GET /` reports the configured service name, `GET /health` is a liveness
//! probe, and every other request gets a JSON 404.

pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
