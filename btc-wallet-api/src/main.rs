//! BTC Wallet API
//!
//! This is the HTTP API server for the BTC Wallet Core.

use std::net::IpAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use btc_wallet_api::{router, ApiConfig};

/// Command line overrides for the environment configuration
#[derive(Debug, Parser)]
#[command(name = "btc-wallet-api", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = ApiConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let addr = config.socket_addr();
    tracing::info!("Starting BTC Wallet API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("BTC Wallet API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
