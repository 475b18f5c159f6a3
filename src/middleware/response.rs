use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Successful `{ "message": ... }` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub message: String,
    pub status_code: Option<StatusCode>,
}

impl ApiResponse {
    /// 200 OK
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// 201 Created
    pub fn created(message: impl Into<String>) -> Self {
        Self::with_status(message, StatusCode::CREATED)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);
        (status, Json(json!({ "message": self.message }))).into_response()
    }
}

pub type ApiResult = Result<ApiResponse, crate::error::ApiError>;
