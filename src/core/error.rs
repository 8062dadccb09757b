//! Application error type.
//!
//! Every failure a handler can surface falls into one of three buckets:
//! rejected input (4xx, the caller must change the request), a storage
//! failure (5xx, the operation did not apply and may be retried whole),
//! or an auth failure (401/403). Fan-out failures on the realtime channel
//! never become an `AppError`; they are logged and swallowed at the
//! `PeerMap` boundary because the store write already succeeded.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    /// Attach caller-visible details. Keep these free of internals; the
    /// static message is what clients key their handling on.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    // Rejected input

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    // Auth

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    // Server-side failures

    /// The store rejected or lost the operation. Nothing was applied;
    /// the caller may retry the whole action.
    pub fn storage_failure() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Storage failure, the operation was not applied",
        )
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

/// Persistence errors are never the caller's fault: anything the database
/// itself reports surfaces as a storage failure, not a 4xx. `RowNotFound`
/// is the one exception, it means the addressed resource does not exist.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Storage unavailable")
            }
            _ => Self::storage_failure(),
        }
    }
}

impl From<axum::Error> for AppError {
    fn from(err: axum::Error) -> Self {
        Self::internal_server_error("Internal server error").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use validator::Validate;

    #[tokio::test]
    async fn database_errors_surface_as_storage_failures() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");

        let err = sqlx::query("SELECT nothing FROM no_such_table")
            .execute(&pool)
            .await
            .expect_err("query against a missing table must fail");
        assert!(matches!(err, sqlx::Error::Database(_)));

        let app = AppError::from(err);
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let app = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(app.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn pool_exhaustion_maps_to_service_unavailable() {
        let app = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(app.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn validation_errors_are_the_caller_problem() {
        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 3))]
            name: &'static str,
        }

        let err = Input { name: "x" }.validate().unwrap_err();
        let app = AppError::from(err);
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    }
}
