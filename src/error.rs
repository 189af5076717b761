// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{AuthError, JwtError};
use crate::database::DatabaseError;
use crate::services::ServiceError;
use crate::storage::StorageError;
use crate::upload::UploadError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Error envelope: `{status: "error", message, code, field_errors?}`
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "status": "error",
            "message": self.message(),
            "code": self.error_code(),
        });
        if let ApiError::UnprocessableEntity { field_errors, .. } = self {
            body["field_errors"] = json!(field_errors);
        }
        body
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
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

    pub fn unprocessable_entity(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::UniqueViolation(constraint) => {
                tracing::info!(constraint = %constraint, "unique constraint rejected write");
                ApiError::conflict("resource already exists")
            }
            DatabaseError::ConfigMissing(var) => {
                tracing::error!("Database not configured: {} is unset", var);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::error!("Token signing failed: {}", err);
        ApiError::internal_server_error("could not issue token")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("invalid credentials"),
            AuthError::AccountInactive => ApiError::forbidden("admin is inactive"),
            AuthError::Token(e) => e.into(),
            AuthError::Database(e) => e.into(),
            AuthError::Internal(msg) => {
                tracing::error!("Login failed internally: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::StorageNotConfigured => ApiError::bad_request(
                "storage not configured: set PUBLIC_BUCKET to enable uploads",
            ),
            UploadError::Timeout(object) => {
                tracing::warn!(object = %object, "media upload timed out");
                ApiError::service_unavailable("media upload timed out, please retry")
            }
            UploadError::Transfer(msg) => {
                tracing::error!("Media upload failed: {}", msg);
                ApiError::internal_server_error("failed to upload media")
            }
            UploadError::Multipart(msg) => ApiError::bad_request(format!("invalid multipart form: {}", msg)),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SigningUnavailable => {
                tracing::error!("Signed url requested but bucket cannot sign");
                ApiError::internal_server_error("failed to generate media url")
            }
            other => UploadError::from(other).into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            ServiceError::Conflict(msg) => ApiError::conflict(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::BadRequest(msg) => ApiError::bad_request(msg),
            ServiceError::Validation(field_errors) => {
                ApiError::unprocessable_entity("validation failed", field_errors)
            }
            ServiceError::Upload(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
            ServiceError::Database(e) => e.into(),
            ServiceError::Password(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ServiceError::Internal(msg) => {
                tracing::error!("Service failure: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_status_and_message() {
        let err = ApiError::forbidden("forbidden");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        let body = err.to_json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "forbidden");
        assert_eq!(body["code"], "FORBIDDEN");
        assert!(body.get("field_errors").is_none());
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), "must be between 3 and 100 characters".to_string());
        let body: ApiError = ServiceError::Validation(fields).into();
        assert_eq!(body.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.to_json()["field_errors"]["title"],
            "must be between 3 and 100 characters"
        );
    }

    #[test]
    fn login_failures_are_distinct() {
        let invalid: ApiError = AuthError::InvalidCredentials.into();
        let inactive: ApiError = AuthError::AccountInactive.into();
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(inactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(inactive.message(), "admin is inactive");
    }

    #[test]
    fn storage_errors_keep_internal_detail_private() {
        let missing: ApiError = UploadError::StorageNotConfigured.into();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let transfer: ApiError = UploadError::Transfer("gcs responded 403 secret-bucket".into()).into();
        assert_eq!(transfer.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!transfer.message().contains("secret-bucket"));

        let timeout: ApiError = StorageError::Timeout("a.png".into()).into();
        assert_eq!(timeout.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unique_violation_is_conflict() {
        let err: ApiError = DatabaseError::UniqueViolation("admins_email_key".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
