use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rkube::controllers::ReplicaSetController;
use rkube::registry::{PodRegistry, ReplicaSetRegistry};
use rkube::shutdown::shutdown_token;
use rkube::storage::{EtcdStore, Storage};

#[derive(Parser)]
#[command(name = "controller", about = "Start the rkube controller")]
struct Args {
    /// URL of the API server; accepted for launcher compatibility, the
    /// controller writes through the store directly.
    #[arg(long = "api-server", default_value = "localhost:8080")]
    api_server: String,

    /// Client port of the etcd cluster backing the store.
    #[arg(long, default_value_t = 2379)]
    etcd_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rkube=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!(
        api_server = %args.api_server,
        etcd_port = args.etcd_port,
        "Starting controller"
    );

    let endpoints = vec![format!("http://localhost:{}", args.etcd_port)];
    let store = EtcdStore::connect(&endpoints)
        .await
        .context("failed to create etcd client")?;
    let storage = Storage::new(Arc::new(store));

    let replicasets = Arc::new(ReplicaSetRegistry::new(storage.clone()));
    let pods = Arc::new(PodRegistry::new(storage));
    let controller = ReplicaSetController::new(replicasets, pods);

    controller.run(shutdown_token()).await;
    Ok(())
}
