//! Object storage for article media.

pub mod gcs;

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use gcs::GcsStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object storage is not configured")]
    NotConfigured,

    #[error("upload of '{0}' timed out")]
    Timeout(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("signed urls are not available for this bucket")]
    SigningUnavailable,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `object_name`. Returns a public URL, or the object
    /// name itself when the bucket is private.
    async fn upload(
        &self,
        bytes: Bytes,
        object_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// URL granting read access to `object_name` for `ttl`.
    async fn signed_url(&self, object_name: &str, ttl: Duration) -> Result<String, StorageError>;
}
