use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{authorize, AccessPolicy, ApiResponse, ApiResult, JsonBody};
use crate::services::NotificationService;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomEmailRequest {
    pub email: Option<String>,
    pub subject: Option<String>,
    pub html_format: Option<String>,
    pub test: bool,
}

/// POST /notifications/customEmail - Send caller-provided HTML to one address
pub async fn custom_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<CustomEmailRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;

    NotificationService::new(&db, &state.config, state.mailer.as_ref())
        .custom_email(
            body.email.as_deref(),
            body.subject.as_deref(),
            body.html_format.as_deref(),
        )
        .await?;
    Ok(ApiResponse::created("Correo electrónico enviado correctamente."))
}
