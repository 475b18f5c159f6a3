// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::mail::MailError;
use crate::report::ReportError;
use crate::supabase::SupabaseError;

/// HTTP API error carrying the client-facing detail text.
///
/// Every variant renders as `{ "message": "<prefix>\"<TAG>: <detail>\"" }`,
/// the wire format the web client already parses.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Detail text without tag
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Status tag placed in front of the detail
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ApiError::BadRequest(_) => Some("BAD REQUEST"),
            ApiError::Unauthorized(_) => Some("UNAUTHORIZED"),
            ApiError::Forbidden(_) => Some("FORBIDDEN"),
            ApiError::NotFound(_) => Some("NOT FOUND"),
            ApiError::Conflict(_) => Some("CONFLICT"),
            ApiError::InternalServerError(_) => None,
        }
    }

    /// Tagged text, e.g. `BAD REQUEST: No se proporcionó un email`
    pub fn tagged(&self) -> String {
        match self.tag() {
            Some(tag) => format!("{}: {}", tag, self.message()),
            None => self.message().to_string(),
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Ocurrió el siguiente error de solicitud incorrecta: ",
            ApiError::Unauthorized(_) => "Ocurrió el siguiente error de autorización: ",
            ApiError::Forbidden(_) => "Ocurrió el siguiente error de prohibición: ",
            ApiError::NotFound(_) => "Ocurrió el siguiente error de localización: ",
            ApiError::Conflict(_) => "Ocurrió el siguiente error de conflictos: ",
            ApiError::InternalServerError(_) => "Ocurrió el siguiente error: ",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let quoted = Value::String(self.tagged()).to_string();
        json!({ "message": format!("{}{}", self.prefix(), quoted) })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<SupabaseError> for ApiError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                tracing::error!("Supabase error: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        tracing::error!("Mail error: {}", err);
        ApiError::internal_server_error(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        tracing::error!("Report error: {}", err);
        ApiError::internal_server_error(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tagged())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
