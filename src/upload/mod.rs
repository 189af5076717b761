//! Multipart article forms and the media they carry.
//!
//! Keyed content files (`content_files[<key>]` or `content_file_<key>`) are
//! uploaded to object storage and collected into an [`UploadMapping`] that the
//! content injector later resolves against the article body.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use chrono::Utc;
use futures::future::try_join_all;
use thiserror::Error;

use crate::storage::{ObjectStore, StorageError};

/// Upload key → resolved URL for a single request
pub type UploadMapping = HashMap<String, String>;

pub const HEADER_FILE_FIELD: &str = "photo_header_file";
const CONTENT_PREFIX: &str = "articles/content";
const ARTICLES_PREFIX: &str = "articles";
const HEADER_KEY: &str = "header";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("storage not configured")]
    StorageNotConfigured,

    #[error("upload timed out: {0}")]
    Timeout(String),

    #[error("upload failed: {0}")]
    Transfer(String),

    #[error("invalid multipart form: {0}")]
    Multipart(String),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotConfigured => UploadError::StorageNotConfigured,
            StorageError::Timeout(object) => UploadError::Timeout(object),
            other => UploadError::Transfer(other.to_string()),
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err.body_text())
    }
}

/// A file part buffered from the form
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct ContentFile {
    pub key: String,
    pub file: PendingFile,
}

/// Parsed article form: text fields, optional header image, keyed content files.
#[derive(Debug, Default)]
pub struct ArticleForm {
    fields: HashMap<String, String>,
    pub header_file: Option<PendingFile>,
    pub content_files: Vec<ContentFile>,
}

impl ArticleForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut form = ArticleForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();

            if file_name.is_empty() {
                let value = field.text().await?;
                form.push_text(name, value);
                continue;
            }

            if !form.wants_file(&name) {
                continue;
            }

            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            form.push_file(
                &name,
                PendingFile {
                    file_name,
                    content_type,
                    bytes,
                },
            );
        }

        Ok(form)
    }

    /// First value for a text field wins
    pub fn push_text(&mut self, name: String, value: String) {
        self.fields.entry(name).or_insert(value);
    }

    fn wants_file(&self, field: &str) -> bool {
        if field == HEADER_FILE_FIELD {
            return self.header_file.is_none();
        }
        match extract_upload_key(field) {
            Some(key) => !self.content_files.iter().any(|cf| cf.key == key),
            None => false,
        }
    }

    /// Accepts the header file and the first file per upload key; anything
    /// else is dropped.
    pub fn push_file(&mut self, field: &str, file: PendingFile) {
        if !self.wants_file(field) {
            return;
        }
        if field == HEADER_FILE_FIELD {
            self.header_file = Some(file);
        } else if let Some(key) = extract_upload_key(field) {
            self.content_files.push(ContentFile { key, file });
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text value with surrounding whitespace removed; empty becomes `None`
    pub fn trimmed(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// `content_files[<key>]` or `content_file_<key>` → `<key>`.
pub fn extract_upload_key(field: &str) -> Option<String> {
    let raw = if let Some(inner) = field
        .strip_prefix("content_files[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        inner
    } else if let Some(rest) = field.strip_prefix("content_file_") {
        rest
    } else {
        return None;
    };

    let key = raw.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Final path component of a client file name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => "file".to_string(),
        other => other.to_string(),
    }
}

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Nanosecond wall-clock stamp, strictly increasing within the process.
fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// `{prefix}/{key}_{stamp}_{file}`; separators in `key` become `_`.
pub fn object_name(prefix: &str, key: &str, file_name: &str) -> String {
    format!(
        "{}/{}_{}_{}",
        prefix,
        key.replace(['/', '\\'], "_"),
        next_stamp(),
        sanitize_filename(file_name)
    )
}

pub fn content_object_name(key: &str, file_name: &str) -> String {
    object_name(CONTENT_PREFIX, key, file_name)
}

pub fn header_object_name(file_name: &str) -> String {
    object_name(ARTICLES_PREFIX, HEADER_KEY, file_name)
}

/// Sends buffered form files to object storage.
#[derive(Clone)]
pub struct MediaUploader {
    store: Arc<dyn ObjectStore>,
}

impl MediaUploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Upload every keyed file concurrently. The first failure fails the whole
    /// batch; objects already written are left in place.
    pub async fn upload_content(&self, files: &[ContentFile]) -> Result<UploadMapping, UploadError> {
        let uploads = files.iter().map(|cf| async move {
            let object_name = content_object_name(&cf.key, &cf.file.file_name);
            let url = self.put(&object_name, &cf.file).await?;
            Ok::<_, UploadError>((cf.key.clone(), url))
        });

        let mapping: UploadMapping = try_join_all(uploads).await?.into_iter().collect();
        if !mapping.is_empty() {
            tracing::debug!(count = mapping.len(), "content files uploaded");
        }
        Ok(mapping)
    }

    pub async fn upload_header(&self, file: &PendingFile) -> Result<String, UploadError> {
        let object_name = header_object_name(&file.file_name);
        self.put(&object_name, file).await
    }

    async fn put(&self, object_name: &str, file: &PendingFile) -> Result<String, UploadError> {
        self.store
            .upload(file.bytes.clone(), object_name, file.content_type.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(object = object_name, error = %e, "article media upload failed");
                UploadError::from(e)
            })
    }
}
