use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::models::Node;

use super::response::ApiError;
use super::server::AppState;

pub async fn create_node(
    State(state): State<AppState>,
    Json(mut node): Json<Node>,
) -> Result<(StatusCode, Json<Node>), ApiError> {
    state.nodes.create_node(&mut node).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

pub async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<Node>>, ApiError> {
    Ok(Json(state.nodes.list_nodes().await?))
}

pub async fn get_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Node>, ApiError> {
    Ok(Json(state.nodes.get_node(&name).await?))
}

pub async fn update_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(node): Json<Node>,
) -> Result<Json<Node>, ApiError> {
    let existing = state.nodes.get_node(&name).await?;
    if existing.metadata.name != node.metadata.name {
        return Err(ApiError::name_mismatch("node"));
    }

    state.nodes.update_node(&node).await?;
    Ok(Json(node))
}

pub async fn delete_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let node = state.nodes.get_node(&name).await?;
    state.nodes.delete_node(&node.metadata.name).await?;
    Ok(StatusCode::NO_CONTENT)
}
