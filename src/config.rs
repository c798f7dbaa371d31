//! Configuration and constants.
//!
//! Everything is resolved once at startup from the environment (or the
//! equivalent command line flags) and never mutated afterwards. `AppConfig` is
//! the root configuration struct handed to the router and the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use const_format::formatcp;

// =============================================================================
// Defaults
// =============================================================================

/// Default TCP port when `PORT` is not set
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address: all interfaces
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default service name reported by the root endpoint
pub const DEFAULT_SERVICE_NAME: &str = "python-microservice";

/// Default log filter when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str =
    formatcp!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"));

/// Time allowed for open connections to finish after a shutdown signal.
/// Connections still open after this are abandoned.
pub const SHUTDOWN_DRAIN_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// HTTP Response Headers
// =============================================================================

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status answers reflect the live process and must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub http: HttpServerConfig,
    /// Identity reported to clients
    pub service: ServiceConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl HttpServerConfig {
    /// Socket address the listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Label echoed back by `GET /`
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    pub fn new(host: IpAddr, port: u16, service_name: impl Into<String>) -> Self {
        Self {
            http: HttpServerConfig { host, port },
            service: ServiceConfig {
                name: service_name.into(),
            },
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }
}
