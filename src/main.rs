//! Fleet dashboard request proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / fleet-cli                 FLEET DASHBOARD                      Backend API
//!     ───────────────────┐   ┌──────────────────────────────────────────┐
//!       /api/cars?q=...  └──▶│ request id → trace span → timeout        │
//!                            │        │                                 │
//!                            │        ▼                                 │
//!                            │  proxy: <upstream>/api/cars?q=...  ──────┼──▶  /api/cars
//!                            │        │   (headers minus host, body)    │
//!       status/headers/body ◀┼────────┘   ◀──── streamed back ──────────┼───
//!                            └──────────────────────────────────────────┘
//! ```
//!
//! The upstream base is resolved once at startup from `upstream.target`,
//! `API_PROXY_TARGET` or `API_BASE_URL`, then normalized to end in `/api`.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fleet_dashboard::config::{load_or_default, UpstreamTarget};
use fleet_dashboard::http::HttpServer;
use fleet_dashboard::lifecycle::Shutdown;
use fleet_dashboard::observability::{self, metrics};

#[derive(Parser)]
#[command(name = "fleet-dashboard")]
#[command(about = "Request proxy for the fleet maintenance dashboard", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "FLEET_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    observability::init_logging(&config.observability);
    tracing::info!("fleet-dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let upstream = UpstreamTarget::from_config_and_env(config.upstream.target.as_deref());

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %upstream,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, upstream)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
