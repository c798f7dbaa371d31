//! HTTP server startup logic.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::{AppConfig, SHUTDOWN_DRAIN_TIMEOUT_SECS};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the listener and serve `app` until a shutdown signal arrives.
///
/// A bind failure is returned immediately; there is no fallback address.
/// The listener is owned by this future and dropped on every exit path.
///
/// After the signal, open connections get `SHUTDOWN_DRAIN_TIMEOUT_SECS` to
/// finish. A client stalling mid-request cannot keep the process alive.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = config.http.bind_addr();
    let signal = shutdown::shutdown_signal();
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        signal.await;
        let _ = signalled_tx.send(());
    };

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener.local_addr().unwrap_or(addr);

    tracing::info!(
        service = %config.service.name,
        addr = %local_addr,
        "Serving {} on {}",
        config.service.name,
        local_addr
    );

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    let drain_timeout = Duration::from_secs(SHUTDOWN_DRAIN_TIMEOUT_SECS);
    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(drain_timeout).await,
            Err(_) => std::future::pending().await,
        }
    };

    tokio::select! {
        result = serve => result.map_err(ServerError::Serve)?,
        _ = drain_deadline => {
            tracing::warn!(
                timeout_secs = SHUTDOWN_DRAIN_TIMEOUT_SECS,
                "Connections still open after drain timeout, abandoning them"
            );
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
