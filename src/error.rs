//! Application error taxonomy and HTTP response mapping.
//!
//! Validation and reserved-slug failures are detected before any store is
//! touched. Unique violations from the durable store are translated into
//! [`AppError::Conflict`] at the repository boundary. Rate-limiter store
//! failures are fatal to the request ([`AppError::Dependency`], fail closed),
//! while cache failures never reach this type at all (the cache layer
//! swallows them as misses).

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("slug '{slug}' is reserved")]
    ReservedSlug { slug: String },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Sliding-window limit exceeded. Carries the seconds until the oldest
    /// event in the window falls out.
    #[error("rate limit exceeded, retry in {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// A required backing store (durable store or counter store) is
    /// unreachable. Never used for the cache store.
    #[error("{message}")]
    Dependency { message: String },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn rate_limited(retry_after: u64) -> Self {
        Self::RateLimited { retry_after }
    }
    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message, details)
            }
            AppError::ReservedSlug { slug } => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("slug '{slug}' is reserved"),
                json!({ "slug": slug }),
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message, details)
            }
            AppError::Forbidden { message, details } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", message, details)
            }
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "CONFLICT", message, details)
            }
            AppError::RateLimited { retry_after } => {
                let body = ErrorBody {
                    error: ErrorInfo {
                        code: "TOO_MANY_REQUESTS",
                        message: format!(
                            "Rate limit exceeded. Please try again in {retry_after} seconds"
                        ),
                        details: json!({ "retry_after_seconds": retry_after }),
                    },
                };
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after.to_string())],
                    Json(body),
                )
                    .into_response();
            }
            // Internal diagnostics stay out of the response body.
            AppError::Dependency { message } => {
                tracing::error!("dependency failure: {message}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "INTERNAL",
                    "A required backing service is unavailable".to_string(),
                    json!({}),
                )
            }
            AppError::Internal { message, details } => {
                tracing::error!("internal error: {message} {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An unexpected error occurred".to_string(),
                    json!({}),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Slug already exists",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "source": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Validation failed",
            serde_json::to_value(&e).unwrap_or_else(|_| json!({})),
        )
    }
}
