use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{authorize, AccessPolicy, ApiResponse, ApiResult, JsonBody};
use crate::services::{required, AccountService};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub old_password: Option<String>,
    pub test: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequest {
    pub email: Option<String>,
    pub token: Option<String>,
    pub test: bool,
}

/// PUT /auth/changePassword - Set a new password after re-authenticating
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;

    let password = required(body.password.as_deref(), "No se proporcionó una contraseña")?;
    let email = required(body.email.as_deref(), "No se proporcionó un email")?;
    let old_password = body.old_password.as_deref().unwrap_or_default();

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .change_password(email, old_password, password)
        .await?;
    Ok(ApiResponse::success("Contraseña cambiada correctamente."))
}

/// POST /auth/forgotPassword - Mail a reset confirmation link
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ResetRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::Admin).await?;
    let email = required(body.email.as_deref(), "No se proporcionó un email")?;

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .forgot_password(email)
        .await?;
    Ok(ApiResponse::created(format!(
        "Un correo de confirmación ha sido enviado a su correo electrónico {}.",
        email
    )))
}

/// POST /auth/confirmForgotPassword - Exchange a reset token for a provisional password
pub async fn confirm_forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ResetRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::Admin).await?;
    let email = required(body.email.as_deref(), "No se proporcionó un email")?;
    let token = body.token.as_deref().unwrap_or_default();

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .confirm_forgot_password(email, token)
        .await?;
    Ok(ApiResponse::created(format!(
        "Un correo con su contraseña provisional ha sido enviado a su correo electrónico {}.",
        email
    )))
}

/// POST /password/forgotPassword - Direct reset to a provisional password
pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ResetRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::Admin).await?;
    let email = required(body.email.as_deref(), "No se proporcionó un email")?;

    AccountService::new(&db, &state.config, state.mailer.as_ref())
        .reset_password(email)
        .await?;
    Ok(ApiResponse::created("Contraseña reestablecida correctamente."))
}
