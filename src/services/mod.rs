pub mod admin_service;
pub mod article_service;
pub mod contact_service;
pub mod registration_service;

use thiserror::Error;

use crate::database::DatabaseError;
use crate::storage::StorageError;
use crate::upload::UploadError;
use crate::validation::FieldErrors;

pub use admin_service::{AdminInput, AdminService};
pub use article_service::{ArticleFields, ArticleService, MEDIA_URL_TTL};
pub use contact_service::{ContactInput, ContactService};
pub use registration_service::{RegistrationInput, RegistrationService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error("{0}")]
    Internal(String),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// Maps a repository `NotFound` onto a named entity
pub(crate) fn missing(entity: &'static str) -> impl FnOnce(DatabaseError) -> ServiceError {
    move |err| match err {
        DatabaseError::NotFound(_) => ServiceError::NotFound(entity),
        other => ServiceError::Database(other),
    }
}
