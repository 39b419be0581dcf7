use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rkube::registry::{NodeRegistry, PodRegistry};
use rkube::scheduler::Scheduler;
use rkube::shutdown::shutdown_token;
use rkube::storage::{EtcdStore, Storage};

#[derive(Parser)]
#[command(name = "scheduler", about = "Start the rkube scheduler")]
struct Args {
    /// Client port of the etcd cluster backing the store.
    #[arg(long, default_value_t = 2379)]
    etcd_port: u16,

    /// How often to run the scheduling loop.
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    scheduling_rate: Duration,
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

    let endpoints = vec![format!("http://localhost:{}", args.etcd_port)];
    let store = EtcdStore::connect(&endpoints)
        .await
        .context("failed to create etcd client")?;
    let storage = Storage::new(Arc::new(store));

    let pods = Arc::new(PodRegistry::new(storage.clone()));
    let nodes = Arc::new(NodeRegistry::new(storage));
    let scheduler = Scheduler::new(pods, nodes, args.scheduling_rate);

    scheduler.run(shutdown_token()).await;
    Ok(())
}
