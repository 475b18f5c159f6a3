use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::supabase::SupabaseClient;

/// How a route proves who is calling before it touches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Signed-in user; the token is forwarded to the backend.
    UserToken,
    /// Scheduler with the service-role key, or a signed-in user.
    ServiceOrUserToken,
    /// No caller identity; runs with service credentials (password reset).
    Admin,
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the backend client a request runs with.
///
/// Production requests act with the caller's credentials and are rejected
/// before any query when the token is missing or unknown to the auth
/// server. Development requests (and any request flagged `test`) use the
/// development project with its service role.
pub async fn authorize(
    config: &AppConfig,
    headers: &HeaderMap,
    test: bool,
    policy: AccessPolicy,
) -> Result<SupabaseClient, ApiError> {
    let supabase = &config.supabase;

    if !supabase.is_production(test) {
        tracing::info!("Environment: development");
        return Ok(SupabaseClient::new(&supabase.sb_url, &supabase.sb_service_role));
    }

    tracing::info!("Environment: production");
    match policy {
        AccessPolicy::Admin => Ok(admin_client(config)),
        AccessPolicy::UserToken => {
            let token = require_token(headers)?;
            let client = SupabaseClient::new(&supabase.url, &supabase.anon_key).with_bearer(&token);
            verify_user(&client, &token).await?;
            Ok(client)
        }
        AccessPolicy::ServiceOrUserToken => {
            let token = require_token(headers)?;
            if token == supabase.sb_service_role {
                return Ok(SupabaseClient::new(&supabase.sb_url, &supabase.sb_service_role));
            }
            let client =
                SupabaseClient::new(&supabase.url, &supabase.sb_service_role).with_bearer(&token);
            verify_user(&client, &token).await?;
            Ok(client)
        }
    }
}

/// Service-role client for auth administration (`SB_URL` + `SUPABASE_SERVICE_ROLE_KEY`).
pub fn admin_client(config: &AppConfig) -> SupabaseClient {
    SupabaseClient::new(&config.supabase.sb_url, &config.supabase.service_role_key)
}

fn require_token(headers: &HeaderMap) -> Result<String, ApiError> {
    extract_bearer(headers)
        .ok_or_else(|| ApiError::forbidden("Prohibido: Falta el token de autenticación."))
}

async fn verify_user(client: &SupabaseClient, token: &str) -> Result<(), ApiError> {
    client.get_user(token).await.map(|_| ()).map_err(|e| {
        tracing::warn!("Rejected access token: {}", e);
        ApiError::unauthorized("Token de autorización inválido.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    fn production_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.supabase.url = "http://public.invalid".to_string();
        config.supabase.anon_key = "anon".to_string();
        config.supabase.sb_key = "anon".to_string();
        config.supabase.sb_url = "http://service.invalid".to_string();
        config.supabase.sb_service_role = "service".to_string();
        config.supabase.service_role_key = "admin".to_string();
        config
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(extract_bearer(&headers("abc")).as_deref(), Some("abc"));
        assert!(extract_bearer(&headers("Bearer ")).is_none());
        assert!(extract_bearer(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn missing_token_is_forbidden_in_production() {
        let err = authorize(&production_config(), &HeaderMap::new(), false, AccessPolicy::UserToken)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_flag_selects_development_client() {
        let client = authorize(&production_config(), &HeaderMap::new(), true, AccessPolicy::UserToken)
            .await
            .unwrap();
        assert_eq!(client.base_url(), "http://service.invalid");
        assert_eq!(client.api_key(), "service");
    }

    #[tokio::test]
    async fn service_role_token_skips_user_check() {
        let client = authorize(
            &production_config(),
            &headers("Bearer service"),
            false,
            AccessPolicy::ServiceOrUserToken,
        )
        .await
        .unwrap();
        assert_eq!(client.base_url(), "http://service.invalid");
    }

    #[tokio::test]
    async fn admin_policy_uses_service_role_key_in_production() {
        let client = authorize(&production_config(), &HeaderMap::new(), false, AccessPolicy::Admin)
            .await
            .unwrap();
        assert_eq!(client.api_key(), "admin");
    }
}
