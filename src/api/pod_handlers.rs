use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::models::Pod;

use super::response::ApiError;
use super::server::AppState;

pub async fn create_pod(
    State(state): State<AppState>,
    Json(mut pod): Json<Pod>,
) -> Result<(StatusCode, Json<Pod>), ApiError> {
    state.pods.create_pod(&mut pod).await?;
    Ok((StatusCode::CREATED, Json(pod)))
}

pub async fn list_pods(State(state): State<AppState>) -> Result<Json<Vec<Pod>>, ApiError> {
    Ok(Json(state.pods.list_pods().await?))
}

pub async fn list_unassigned_pods(
    State(state): State<AppState>,
) -> Result<Json<Vec<Pod>>, ApiError> {
    Ok(Json(state.pods.list_unassigned_pods().await?))
}

pub async fn get_pod(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Pod>, ApiError> {
    Ok(Json(state.pods.get_pod(&name).await?))
}

pub async fn update_pod(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(pod): Json<Pod>,
) -> Result<Json<Pod>, ApiError> {
    // Resolve the target first so an unknown name is a 404, not an upsert.
    let existing = state.pods.get_pod(&name).await?;
    if existing.metadata.name != pod.metadata.name {
        return Err(ApiError::name_mismatch("pod"));
    }

    state.pods.update_pod(&pod).await?;
    Ok(Json(pod))
}

pub async fn delete_pod(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pod = state.pods.get_pod(&name).await?;
    state.pods.delete_pod(&pod.metadata.name).await?;
    Ok(StatusCode::NO_CONTENT)
}
