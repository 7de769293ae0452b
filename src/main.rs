//! API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ GatewayServer ──▶ DispatchTable ──▶ ProxyEngine ──▶ Backend
//!                     │              (mount match)     (pooled client)
//!                     │                   │
//!                     │              no match → 404
//!                     ◀─────────── status + headers + body relayed ◀──┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use commerce_gateway::config::load_or_default;
use commerce_gateway::lifecycle::{signals, Shutdown};
use commerce_gateway::observability::{logging, metrics};
use commerce_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "API gateway for the inventory and orders services", long_about = None)]
struct Cli {
    /// Platform configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gateway starting");
    tracing::info!(
        bind_address = %config.gateway.bind_address,
        routes = config.gateway.routes.len(),
        upstream_timeout_secs = config.gateway.timeouts.upstream_secs,
        max_concurrent_requests = ?config.gateway.limits.max_concurrent_requests,
        max_body_bytes = ?config.gateway.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.gateway.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    GatewayServer::new(&config.gateway)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
