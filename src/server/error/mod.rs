//! Error types and HTTP response handling.
//!
//! `AppError` is the top-level error returned by every handler. It wraps the domain
//! specific errors and maps each variant to an HTTP status with an `ErrorDto` body.
//! Server side failures are logged and answered with a generic message.

pub mod auth;
pub mod config;
pub mod internal;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, internal::InternalError},
};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization error.
    ///
    /// Delegates to `AuthError::into_response()` for status code mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Token signing failure.
    #[error(transparent)]
    JwtErr(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure.
    #[error(transparent)]
    HashErr(#[from] bcrypt::BcryptError),

    /// SMTP delivery failure.
    #[error(transparent)]
    MailErr(#[from] lettre::transport::smtp::Error),

    /// Failure to assemble an email message.
    #[error(transparent)]
    MailBuildErr(#[from] lettre::error::Error),

    /// Invalid mailbox address.
    #[error(transparent)]
    MailAddressErr(#[from] lettre::address::AddressError),

    /// Blocking task panicked or was cancelled.
    #[error(transparent)]
    JoinErr(#[from] tokio::task::JoinError),

    /// Listener or socket failure.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Inconsistent stored data.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Resource not found. Results in 404.
    #[error("{0}")]
    NotFound(String),

    /// Invalid request. Results in 400.
    #[error("{0}")]
    BadRequest(String),

    /// Uniqueness violation. Results in 409.
    #[error("{0}")]
    Conflict(String),

    /// Authenticated caller may not act on the resource. Results in 403.
    #[error("{0}")]
    Forbidden(String),

    /// Internal server error with custom message.
    ///
    /// The message is logged but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - For `BadRequest` variant
/// - 403 Forbidden - For `Forbidden` variant
/// - 404 Not Found - For `NotFound` variant
/// - 409 Conflict - For `Conflict` variant
/// - Variable - For `AuthErr`, delegated to `AuthError::into_response()`
/// - 500 Internal Server Error - For all other error types
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => error_response(StatusCode::CONFLICT, msg),
            Self::Forbidden(msg) => error_response(StatusCode::FORBIDDEN, msg),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected Error Occurred".to_string(),
                )
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorDto { error })).into_response()
}

/// Wrapper converting any displayable error into a 500 response.
///
/// Logs the full error and returns a generic message to the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected Error Occurred".to_string(),
        )
    }
}
