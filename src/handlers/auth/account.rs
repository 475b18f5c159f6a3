use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{admin_client, authorize, AccessPolicy, ApiResponse, ApiResult, JsonBody};
use crate::services::{AccountService, SignUpRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangeEmailRequest {
    pub id: Option<String>,
    pub email: Option<String>,
    pub test: bool,
}

/// POST /auth/signUp - Register a user and mail the provisional password
pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<SignUpRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .sign_up(&body)
        .await?;
    Ok(ApiResponse::created("Usuario creado correctamente."))
}

/// PUT /auth/changeUserEmail - Move a user to a new email address
pub async fn change_user_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ChangeEmailRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;
    let admin = admin_client(&state.config);

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .change_user_email(&admin, body.id.as_deref(), body.email.as_deref())
        .await?;
    Ok(ApiResponse::success("Email de usuario actualizado correctamente."))
}
