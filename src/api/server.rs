use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::registry::{NodeRegistry, PodRegistry, ReplicaSetRegistry};
use crate::storage::Storage;

/// Registries shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pods: Arc<PodRegistry>,
    pub nodes: Arc<NodeRegistry>,
    pub replicasets: Arc<ReplicaSetRegistry>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self {
            pods: Arc::new(PodRegistry::new(storage.clone())),
            nodes: Arc::new(NodeRegistry::new(storage.clone())),
            replicasets: Arc::new(ReplicaSetRegistry::new(storage)),
        }
    }
}

/// Builds the full router; exposed separately so tests can serve it on an
/// ephemeral port.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/v1", super::routes::v1_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until the token is cancelled.
pub async fn serve(
    storage: Storage,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let state = AppState::new(storage);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

pub(crate) async fn healthz() -> StatusCode {
    StatusCode::OK
}
