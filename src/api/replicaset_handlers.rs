use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::models::ReplicaSet;

use super::response::ApiError;
use super::server::AppState;

pub async fn create_replicaset(
    State(state): State<AppState>,
    Json(mut rs): Json<ReplicaSet>,
) -> Result<(StatusCode, Json<ReplicaSet>), ApiError> {
    state.replicasets.create(&mut rs).await?;
    Ok((StatusCode::CREATED, Json(rs)))
}

pub async fn list_replicasets(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReplicaSet>>, ApiError> {
    Ok(Json(state.replicasets.list().await?))
}

pub async fn get_replicaset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ReplicaSet>, ApiError> {
    Ok(Json(state.replicasets.get(&name).await?))
}

pub async fn update_replicaset(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(rs): Json<ReplicaSet>,
) -> Result<Json<ReplicaSet>, ApiError> {
    let existing = state.replicasets.get(&name).await?;
    if existing.metadata.name != rs.metadata.name {
        return Err(ApiError::name_mismatch("replicaset"));
    }

    state.replicasets.update(&rs).await?;
    Ok(Json(rs))
}

pub async fn delete_replicaset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rs = state.replicasets.get(&name).await?;
    state.replicasets.delete(&rs.metadata.name).await?;
    Ok(StatusCode::NO_CONTENT)
}
