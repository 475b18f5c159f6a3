use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("{message} ({status})")]
    Http { status: StatusCode, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Decode error: {0}")]
    Decode(String),
}

impl SupabaseError {
    /// Build from a non-success response, keeping the server's message when present.
    ///
    /// PostgREST answers `{ message, code, details, hint }`; GoTrue uses
    /// `msg` or `error_description`; Storage uses `message` or `error`.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.to_string());
        SupabaseError::Http { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SupabaseError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
