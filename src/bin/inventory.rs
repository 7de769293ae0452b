//! Inventory backend service.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use commerce_gateway::config::load_or_default;
use commerce_gateway::lifecycle::{signals, Shutdown};
use commerce_gateway::observability::logging;
use commerce_gateway::services::{self, inventory::{self, InventoryState}};

#[derive(Parser)]
#[command(name = "inventory")]
#[command(about = "Inventory service: products, discounts and promotions", long_about = None)]
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
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "inventory service starting");

    let listener = TcpListener::bind(&config.inventory.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let router = inventory::router(InventoryState::default());
    services::serve("inventory", router, listener, server_shutdown).await?;

    Ok(())
}
