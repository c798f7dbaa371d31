//! HTTP server module.
//!
//! The server includes:
//! - A plain HTTP listener bound once at startup
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
