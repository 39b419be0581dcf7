use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::registry::RegistryError;

/// Registry error carried to the HTTP layer. Maps the error taxonomy onto
/// status codes and renders a JSON error body.
pub struct ApiError(pub RegistryError);

impl ApiError {
    pub fn name_mismatch(kind: &'static str) -> Self {
        Self(RegistryError::Invalid {
            kind,
            detail: "name in URL does not match name in request body".into(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RegistryError::Invalid { .. } => StatusCode::BAD_REQUEST,
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::AlreadyExists { .. } => StatusCode::CONFLICT,
            RegistryError::Storage(_) | RegistryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
