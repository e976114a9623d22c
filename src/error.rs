//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error taxonomy surfaced to clients. None of these are retried
/// automatically; the client displays them and stops its loading state.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid step number: {0}. Must be between 1 and 4.")]
    InvalidStepNumber(i32),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Map an insert error, turning a unique-constraint violation into the
    /// given conflict error. Two concurrent inserts of the same email both
    /// pass the pre-insert lookup; the loser must still surface as a 409,
    /// not a 500.
    pub fn on_unique_violation(err: sqlx::Error, conflict: ApiError) -> ApiError {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => conflict,
            err => ApiError::Database(err),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::DuplicateEmail => (StatusCode::CONFLICT, "duplicate_email", None),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }
            ApiError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated", None),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", None),
            ApiError::InvalidStepNumber(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_step_number",
                Some(self.to_string()),
            ),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation", Some(msg.clone()))
            }
            ApiError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::DuplicateEmail.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::UserNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidStepNumber(7).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_step_message_names_the_step() {
        let msg = ApiError::InvalidStepNumber(9).to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("between 1 and 4"));
    }

    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("stub database error")
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_becomes_the_conflict_error() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: true }));
        let mapped = ApiError::on_unique_violation(err, ApiError::DuplicateEmail);
        assert!(matches!(mapped, ApiError::DuplicateEmail));
        assert_eq!(mapped.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_insert_errors_stay_database_errors() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: false }));
        let mapped = ApiError::on_unique_violation(err, ApiError::DuplicateEmail);
        assert!(matches!(mapped, ApiError::Database(_)));

        let mapped = ApiError::on_unique_violation(sqlx::Error::RowNotFound, ApiError::DuplicateEmail);
        assert!(matches!(mapped, ApiError::Database(_)));
    }
}
