//! statusd: application entry point.
//!
//! Resolves configuration from the environment (or flags), initializes
//! tracing, builds the router and serves until SIGINT/SIGTERM.

use std::net::IpAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statusd::config::{
    AppConfig, LogFormat, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_SERVICE_NAME,
};
use statusd::http::start_server;
use statusd::{create_router, AppState};

/// statusd: a status and health-check HTTP service
#[derive(Parser, Debug)]
#[command(name = "statusd", version, about)]
struct Args {
    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = DEFAULT_HOST)]
    host: IpAddr,

    /// Name reported by the root endpoint
    #[arg(long, env = "SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,

    /// Log level filter (e.g., "statusd=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Args {
    fn into_config(self) -> AppConfig {
        AppConfig::new(self.host, self.port, self.service_name).with_log_format(self.log_format)
    }
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = Args::parse();

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .take()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let config = args.into_config();
    init_tracing(&log_filter, config.logging.format);

    tracing::debug!(?config, "Loaded configuration");

    let state = AppState::new(config.clone());
    let app = create_router(state);

    if let Err(e) = start_server(app, &config).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
