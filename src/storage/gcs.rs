use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;

/// Google Cloud Storage through the JSON upload API.
pub struct GcsStore {
    client: reqwest::Client,
    bucket: Option<String>,
    access_token: Option<String>,
    is_public: bool,
    timeout: Duration,
    api_base_url: String,
    public_base_url: String,
}

impl GcsStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &StorageConfig) -> Self {
        if config.public_bucket.is_none() {
            tracing::warn!("PUBLIC_BUCKET is not set: media uploads are disabled");
        }
        Self {
            client,
            bucket: config.public_bucket.clone(),
            access_token: config.access_token.clone(),
            is_public: config.is_public,
            timeout: config.upload_timeout(),
            api_base_url: config.api_base_url.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    fn bucket(&self) -> Result<&str, StorageError> {
        self.bucket.as_deref().ok_or(StorageError::NotConfigured)
    }

    /// `{public_base}/{bucket}/{object}` with each path segment escaped
    fn public_url(&self, bucket: &str, object_name: &str) -> Result<String, StorageError> {
        let mut url = Url::parse(&self.public_base_url)
            .map_err(|e| StorageError::Transfer(format!("invalid public base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Transfer("public base url cannot hold a path".into()))?
            .pop_if_empty()
            .push(bucket)
            .extend(object_name.split('/'));
        Ok(url.into())
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn upload(
        &self,
        bytes: Bytes,
        object_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let bucket = self.bucket()?;
        let endpoint = format!("{}/upload/storage/v1/b/{}/o", self.api_base_url, bucket);

        let mut request = self
            .client
            .post(&endpoint)
            .query(&[("uploadType", "media"), ("name", object_name)])
            .header(CONTENT_TYPE, content_type.unwrap_or("application/octet-stream"))
            .timeout(self.timeout)
            .body(bytes);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(bucket, object = object_name, "gcs upload timed out");
                StorageError::Timeout(object_name.to_string())
            } else {
                tracing::error!(bucket, object = object_name, error = %e, "gcs upload failed");
                StorageError::Transfer(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(bucket, object = object_name, %status, body = %body, "gcs rejected upload");
            return Err(StorageError::Transfer(format!("gcs responded {}", status)));
        }

        if self.is_public {
            let url = self.public_url(bucket, object_name)?;
            tracing::info!(bucket, object = object_name, url = %url, "public file uploaded to gcs");
            Ok(url)
        } else {
            tracing::info!(bucket, object = object_name, "private file uploaded to gcs");
            Ok(object_name.to_string())
        }
    }

    async fn signed_url(&self, object_name: &str, _ttl: Duration) -> Result<String, StorageError> {
        let bucket = self.bucket()?;
        if self.is_public {
            return self.public_url(bucket, object_name);
        }
        Err(StorageError::SigningUnavailable)
    }
}
