use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use super::client::SupabaseClient;
use super::error::SupabaseError;

/// Identity as reported by the auth server.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Attributes accepted by user updates; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserAttributes {
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }
}

impl SupabaseClient {
    /// Resolve the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let url = self.url("/auth/v1/user")?;
        let response = self.request_as(Method::GET, url, access_token).send().await?;
        SupabaseClient::json(response).await
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let mut url = self.url("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .request_as(Method::POST, url, self.api_key())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        SupabaseClient::json(response).await
    }

    /// Update the user owning `access_token`.
    pub async fn update_user(
        &self,
        access_token: &str,
        attributes: &UserAttributes,
    ) -> Result<AuthUser, SupabaseError> {
        let url = self.url("/auth/v1/user")?;
        let response = self
            .request_as(Method::PUT, url, access_token)
            .json(attributes)
            .send()
            .await?;
        SupabaseClient::json(response).await
    }

    /// Register a new identity. Depending on the project's confirmation
    /// settings the server answers with a session or with the bare user.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, SupabaseError> {
        let url = self.url("/auth/v1/signup")?;
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: Value = SupabaseClient::json(response).await?;
        let user = match body.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => body,
        };
        serde_json::from_value(user).map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    /// Service-role update of any user.
    pub async fn admin_update_user_by_id(
        &self,
        user_id: &str,
        attributes: &UserAttributes,
    ) -> Result<AuthUser, SupabaseError> {
        let url = self.admin_user_url(user_id)?;
        let response = self
            .request_as(Method::PUT, url, self.api_key())
            .json(attributes)
            .send()
            .await?;
        SupabaseClient::json(response).await
    }

    /// `/auth/v1/admin/users/{id}` with the id kept as one encoded segment.
    fn admin_user_url(&self, user_id: &str) -> Result<Url, SupabaseError> {
        let mut url = self.url("/auth/v1/admin/users")?;
        url.path_segments_mut()
            .map_err(|_| SupabaseError::Decode(format!("cannot-be-a-base URL: {}", self.base_url())))?
            .push(user_id);
        Ok(url)
    }
}
