use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One field-level validation failure, reported alongside its siblings.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Error taxonomy for the whole API surface. Every handler failure is one
/// of these; `IntoResponse` is the single place statuses are assigned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request")]
    Validation(Vec<FieldError>),

    #[error("user already exists")]
    DuplicateUser,

    /// Deliberately identical for unknown email and wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("no github profile found")]
    UpstreamNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::DuplicateUser;
            }
        }
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::DuplicateUser => reply(StatusCode::BAD_REQUEST, "User already exists"),
            ApiError::InvalidCredentials => reply(StatusCode::BAD_REQUEST, "Invalid credentials"),
            ApiError::Unauthorized(msg) => reply(StatusCode::UNAUTHORIZED, &msg),
            ApiError::NotFound(msg) => reply(StatusCode::NOT_FOUND, &msg),
            ApiError::UpstreamNotFound => reply(StatusCode::NOT_FOUND, "No GitHub profile found"),
            ApiError::Internal(e) => {
                error!(error = %e, "unexpected internal error");
                reply(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

fn reply(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (
                ApiError::Validation(vec![FieldError::new("email", "Email is required")]),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::DuplicateUser, StatusCode::BAD_REQUEST),
            (ApiError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                ApiError::unauthorized("no token, authorization denied"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::not_found("Profile not found"),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::UpstreamNotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn validation_body_carries_field_messages() {
        let err = ApiError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("password", "Password must be at least 6 characters"),
        ]);
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("collect body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "name");
        assert_eq!(errors[1]["message"], "Password must be at least 6 characters");
    }

    #[test]
    fn non_unique_sqlx_errors_become_internal() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
