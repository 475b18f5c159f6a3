use reqwest::{header, Method, RequestBuilder, Response};
use url::Url;

use super::error::SupabaseError;
use super::query_builder::QueryBuilder;

/// Thin client over a Supabase project's REST surface.
///
/// `api_key` goes in the `apikey` header of every call. The `Authorization`
/// bearer is the forwarded user token when one is set, otherwise the key
/// itself (service role or anon).
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bearer: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bearer: None,
        }
    }

    /// Same project and key, acting as the user identified by `token`.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Start a PostgREST query on `table`.
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, SupabaseError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Request with `apikey` and the acting bearer.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.bearer.as_deref().unwrap_or(&self.api_key);
        self.request_as(method, url, bearer)
    }

    /// Request with `apikey` and an explicit bearer.
    pub(crate) fn request_as(&self, method: Method, url: Url, bearer: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    /// Fail on non-2xx, keeping the body's message.
    pub(crate) async fn check(response: Response) -> Result<Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SupabaseError::from_body(status, &body))
    }

    pub(crate) async fn json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, SupabaseError> {
        let bytes = Self::check(response).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SupabaseError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let client = SupabaseClient::new("https://project.supabase.co/", "key");
        assert_eq!(client.base_url(), "https://project.supabase.co");
        assert_eq!(
            client.url("/rest/v1/users").map(|u| u.to_string()).ok().as_deref(),
            Some("https://project.supabase.co/rest/v1/users")
        );
    }

    #[test]
    fn bearer_defaults_to_api_key() {
        let client = SupabaseClient::new("http://localhost", "service");
        let request = client
            .request(Method::GET, Url::parse("http://localhost/x").unwrap())
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer service");
        assert_eq!(request.headers()["apikey"], "service");

        let request = client
            .with_bearer("user-token")
            .request(Method::GET, Url::parse("http://localhost/x").unwrap())
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer user-token");
    }
}
