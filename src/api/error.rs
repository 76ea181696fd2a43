use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use crate::services::{TodoError, UserError};

#[derive(Debug)]
pub enum ApiError {
    /// Missing entity or malformed id; both render as 404.
    NotFound(String),

    ValidationError(String),

    /// Malformed body or failed login.
    BadRequest(String),

    Conflict(String),

    Unauthorized(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::ValidationError(msg) | Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Duplicate registrations are reported as a plain bad request.
            Self::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error_message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(msg) => Self::ValidationError(msg),
            TodoError::InvalidId(id) | TodoError::NotFound(id) => Self::not_found("Todo", id),
            TodoError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => Self::ValidationError(msg),
            UserError::Conflict(msg) => Self::Conflict(msg),
            UserError::InvalidCredentials => {
                Self::BadRequest(UserError::InvalidCredentials.to_string())
            }
            UserError::InvalidToken => Self::Unauthorized(UserError::InvalidToken.to_string()),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(TodoError::InvalidId("1".into())), StatusCode::NOT_FOUND),
            (ApiError::from(TodoError::NotFound("1".into())), StatusCode::NOT_FOUND),
            (ApiError::from(TodoError::Validation("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(UserError::Conflict("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(UserError::InvalidCredentials), StatusCode::BAD_REQUEST),
            (ApiError::from(UserError::InvalidToken), StatusCode::UNAUTHORIZED),
            (ApiError::from(UserError::Database("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(UserError::Internal("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_malformed_and_missing_ids_look_identical() {
        let malformed = ApiError::from(TodoError::InvalidId("123abc".into())).to_string();
        let missing = ApiError::from(TodoError::NotFound("123abc".into())).to_string();
        assert_eq!(malformed, missing);
    }
}
