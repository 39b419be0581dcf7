use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rkube::api::server;
use rkube::shutdown::shutdown_token;
use rkube::storage::{EtcdStore, Storage};

#[derive(Parser)]
#[command(name = "apiserver", about = "Start the rkube API server")]
struct Args {
    /// The address to serve on.
    #[arg(long, default_value = ":8080")]
    address: String,

    /// Client port of the etcd cluster backing the store.
    #[arg(long, default_value_t = 2379)]
    etcd_client_port: u16,

    /// Peer port of the etcd cluster; accepted for launcher compatibility,
    /// unused when etcd runs externally.
    #[arg(long, default_value_t = 2380)]
    etcd_peer_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rkube=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let endpoints = vec![format!("http://localhost:{}", args.etcd_client_port)];
    let store = EtcdStore::connect(&endpoints)
        .await
        .context("failed to create etcd client")?;
    let storage = Storage::new(Arc::new(store));

    let addr = listen_addr(&args.address)?;
    let shutdown = shutdown_token();

    tracing::info!("Starting API server on {addr}");
    server::serve(storage, addr, shutdown).await
}

/// Accepts both `:8080` and full `host:port` forms.
fn listen_addr(address: &str) -> Result<SocketAddr> {
    let addr = if address.starts_with(':') {
        format!("0.0.0.0{address}")
    } else {
        address.to_string()
    };
    addr.parse()
        .with_context(|| format!("invalid listen address {address:?}"))
}
