// handlers/files/mod.rs - Storage proxy
//
// Deletes objects with the caller's credentials so storage policies still
// apply to the signed-in user.

use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{authorize, AccessPolicy, ApiResponse, ApiResult, JsonBody};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteFileRequest {
    pub bucket_name: Option<String>,
    pub path_name: Option<String>,
    pub test: bool,
}

/// POST /files/deleteFile - Remove one object from a bucket
pub async fn delete_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<DeleteFileRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;

    let target = body
        .bucket_name
        .as_deref()
        .filter(|b| !b.is_empty())
        .zip(body.path_name.as_deref().filter(|p| !p.is_empty()));
    let Some((bucket, path)) = target else {
        return Err(ApiError::bad_request("No se proporcionaron bucket_name o path_name"));
    };

    db.storage_remove(bucket, &[path]).await.map_err(|e| {
        tracing::error!("Failed to delete {}/{}: {}", bucket, path, e);
        ApiError::internal_server_error(e.to_string())
    })?;
    tracing::info!("Deleted {}/{}", bucket, path);
    Ok(ApiResponse::success("Archivo eliminado exitosamente"))
}
