use reqwest::{header, Method};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::client::SupabaseClient;
use super::error::SupabaseError;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl SupabaseClient {
    /// `/storage/v1/object/{prefix...}/{bucket}/{path}` with each path segment encoded.
    fn object_url(&self, prefix: &[&str], bucket: &str, path: &str) -> Result<Url, SupabaseError> {
        let mut url = self.url("/storage/v1/object")?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SupabaseError::Decode(format!("cannot-be-a-base URL: {}", self.base_url())))?;
            segments.extend(prefix);
            segments.push(bucket);
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    pub async fn storage_remove(&self, bucket: &str, paths: &[&str]) -> Result<(), SupabaseError> {
        let url = self.object_url(&[], bucket, "")?;
        let response = self
            .request(Method::DELETE, url)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        SupabaseClient::check(response).await?;
        Ok(())
    }

    pub async fn storage_download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, SupabaseError> {
        let url = self.object_url(&[], bucket, path)?;
        let response = self.request(Method::GET, url).send().await?;
        let bytes = SupabaseClient::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Upload without overwriting; returns the stored key (`bucket/path`).
    pub async fn storage_upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let url = self.object_url(&[], bucket, path)?;
        let response = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadResponse = SupabaseClient::json(response).await?;
        Ok(uploaded.key)
    }

    /// Absolute signed URL valid for `expires_in` seconds.
    pub async fn storage_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> Result<String, SupabaseError> {
        let url = self.object_url(&["sign"], bucket, path)?;
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "expiresIn": expires_in }))
            .send()
            .await?;
        let signed: SignedUrlResponse = SupabaseClient::json(response).await?;
        Ok(format!("{}/storage/v1{}", self.base_url(), signed.signed_url))
    }
}
