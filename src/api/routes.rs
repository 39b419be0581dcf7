use axum::routing::{delete, get, post, put};
use axum::Router;

use super::server::AppState;
use super::{node_handlers, pod_handlers, replicaset_handlers};

pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(super::server::healthz))
        // Pod routes
        .route("/pods", post(pod_handlers::create_pod))
        .route("/pods", get(pod_handlers::list_pods))
        .route("/pods/unassigned", get(pod_handlers::list_unassigned_pods))
        .route("/pods/:name", get(pod_handlers::get_pod))
        .route("/pods/:name", put(pod_handlers::update_pod))
        .route("/pods/:name", delete(pod_handlers::delete_pod))
        // Node routes
        .route("/nodes", post(node_handlers::create_node))
        .route("/nodes", get(node_handlers::list_nodes))
        .route("/nodes/:name", get(node_handlers::get_node))
        .route("/nodes/:name", put(node_handlers::update_node))
        .route("/nodes/:name", delete(node_handlers::delete_node))
        // ReplicaSet routes
        .route("/replicasets", post(replicaset_handlers::create_replicaset))
        .route("/replicasets", get(replicaset_handlers::list_replicasets))
        .route("/replicasets/:name", get(replicaset_handlers::get_replicaset))
        .route("/replicasets/:name", put(replicaset_handlers::update_replicaset))
        .route(
            "/replicasets/:name",
            delete(replicaset_handlers::delete_replicaset),
        )
}
