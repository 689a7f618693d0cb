use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use groups_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Stored data broke the tenant invariant; never the caller's fault.
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::GroupNotFound(_) | DomainError::MemberNotFound { .. } => {
                ApiError::NotFound(message)
            }
            DomainError::AuthorizationError { .. } => ApiError::Forbidden(message),
            DomainError::ValidationError(_) => ApiError::BadRequest(message),
            DomainError::ConcurrentModification(_) => ApiError::Conflict(message),
            DomainError::FileTooLarge => ApiError::PayloadTooLarge(message),
            DomainError::FileNotSupported(_) => ApiError::UnsupportedMediaType(message),
            DomainError::RelationshipViolation { .. } => ApiError::IntegrityError(message),
            DomainError::DatabaseError(_) | DomainError::InternalError(_) => {
                ApiError::InternalError(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "CONFLICT", msg)
            }
            ApiError::PayloadTooLarge(msg) => {
                tracing::warn!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", msg)
            }
            ApiError::UnsupportedMediaType(msg) => {
                tracing::warn!("Unsupported media type: {}", msg);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "FILE_NOT_SUPPORTED", msg)
            }
            ApiError::IntegrityError(msg) => {
                tracing::error!("Integrity error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "RELATIONSHIP_VIOLATION", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                // Storage details stay in the logs
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::failure(code, message))).into_response()
    }
}
