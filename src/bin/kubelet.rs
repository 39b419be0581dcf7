use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rkube::runtime::{DockerRuntime, Kubelet};
use rkube::shutdown::shutdown_token;

#[derive(Parser)]
#[command(name = "kubelet", about = "Start the rkube node agent")]
struct Args {
    /// The name this node registers under.
    #[arg(long)]
    node_name: String,

    /// The URL of the API server.
    #[arg(long, default_value = "localhost:8080")]
    api_server_url: String,
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

    let runtime = DockerRuntime::connect()
        .await
        .context("failed to create kubelet")?;
    let kubelet = Kubelet::new(args.node_name, &args.api_server_url, Arc::new(runtime));

    kubelet.run(shutdown_token()).await
}
