/**
 * API Error Types
 *
 * This module defines the error type used throughout the service layer.
 * Every error carries an explicit kind, and the HTTP boundary maps the
 * kind to a status code. Handlers never inspect error message text.
 *
 * # Error Kinds
 *
 * - `Validation` - missing/malformed input (400)
 * - `Conflict` - duplicate email or slug (400)
 * - `Auth` - bad credentials, unverified email, invalid tokens (401)
 * - `NotFound` - missing timeline/event/image (404)
 * - `Upload` - rejected file uploads (400)
 * - `Internal` - database, hashing, mail and filesystem failures (500)
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Service-level error with an explicit kind
///
/// Services return `Result<_, ApiError>`; the `IntoResponse` impl at the
/// HTTP boundary switches on the variant to pick the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (e.g. blank email, short password)
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated (duplicate email, duplicate slug)
    #[error("{0}")]
    Conflict(String),

    /// Authentication failure (credentials, unverified email, bad tokens)
    #[error("{0}")]
    Auth(String),

    /// The addressed resource does not exist or is not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// A file upload was rejected (type, size, count)
    #[error("{0}")]
    Upload(String),

    /// Anything unexpected: database, hashing, mail, filesystem
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation`, `Conflict`, `Upload` - 400 Bad Request
    /// - `Auth` - 401 Unauthorized
    /// - `NotFound` - 404 Not Found
    /// - `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::Internal("Database error".to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        Self::Internal("Password hashing failed".to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::warn!("Token error: {:?}", err);
        Self::Auth("Invalid or expired session token".to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Filesystem error: {:?}", err);
        Self::Internal("Filesystem error".to_string())
    }
}

/// True if the error is a Postgres unique-constraint violation
///
/// The slug and email pre-checks are racy; the unique index is the
/// authority, and a violation must surface as a Conflict, not a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad input").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("duplicate").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::auth("bad credentials").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::upload("too large").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_preserved() {
        let err = ApiError::not_found("Timeline not found.");
        assert_eq!(err.to_string(), "Timeline not found.");
    }

    #[test]
    fn test_jwt_error_maps_to_auth() {
        let jwt_err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        let err: ApiError = jwt_err.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_row_not_found_is_internal() {
        // RowNotFound means a query used fetch_one where it should not have;
        // lookups that can miss use fetch_optional and map to NotFound themselves.
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
